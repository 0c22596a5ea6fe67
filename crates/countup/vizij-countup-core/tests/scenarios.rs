use std::cell::Cell;
use std::rc::Rc;

use serde::Deserialize;
use vizij_countup_core::{Animator, CountConfig, ManualScheduler, MemorySink};

#[derive(Debug, Deserialize)]
struct Scenario {
    config: CountConfig,
    expected: Expected,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Expected {
    initial: String,
    #[serde(rename = "final")]
    final_text: String,
    count_down: bool,
}

fn run(name: &str, scenario: Scenario) {
    let mut anim = Animator::new(MemorySink::new(), ManualScheduler::new(), scenario.config);
    assert_eq!(anim.sink().content(), scenario.expected.initial, "{name}: initial");
    assert_eq!(anim.is_count_down(), scenario.expected.count_down, "{name}: direction");

    let completed = Rc::new(Cell::new(0usize));
    let c = completed.clone();
    anim.start(None, Some(Box::new(move || c.set(c.get() + 1))))
        .unwrap();
    anim.run_until_idle();

    assert_eq!(anim.sink().content(), scenario.expected.final_text, "{name}: final");
    assert_eq!(completed.get(), 1, "{name}: completion count");
    assert_eq!(anim.scheduler().overlaps(), 0, "{name}: overlapping requests");
    assert!(!anim.is_running(), "{name}: still running");
}

#[test]
fn all_countup_fixtures_reach_their_end_text() {
    let keys = vizij_test_fixtures::countups::keys();
    assert!(!keys.is_empty());
    for name in keys {
        let scenario: Scenario = vizij_test_fixtures::countups::load(&name)
            .unwrap_or_else(|e| panic!("fixture {name}: {e:#}"));
        run(&name, scenario);
    }
}

#[test]
fn final_text_matches_end_value_formatted() {
    for name in vizij_test_fixtures::countups::keys() {
        let scenario: Scenario = vizij_test_fixtures::countups::load(&name).unwrap();
        let anim = Animator::new(
            MemorySink::new(),
            ManualScheduler::new(),
            scenario.config.clone(),
        );
        assert_eq!(
            anim.format_value(scenario.config.end_value),
            scenario.expected.final_text,
            "{name}"
        );
    }
}
