//! Kept in its own test binary: installs a process-wide logger.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::{Level, Log, Metadata, Record};
use vizij_countup_core::{Animator, CountConfig, ManualScheduler, MemorySink};

static WARNINGS: AtomicUsize = AtomicUsize::new(0);

struct CountingLogger;

impl Log for CountingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if record.level() == Level::Warn
            && record.args().to_string().contains("not a number")
        {
            WARNINGS.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn flush(&self) {}
}

static LOGGER: CountingLogger = CountingLogger;

#[test]
fn invalid_bound_emits_one_diagnostic_per_start() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(log::LevelFilter::Warn);

    let mut anim = Animator::new(
        MemorySink::new(),
        ManualScheduler::new(),
        CountConfig::new(f64::NAN, 10.0),
    );
    assert_eq!(WARNINGS.load(Ordering::SeqCst), 0);

    let _ = anim.start(None, None);
    assert_eq!(WARNINGS.load(Ordering::SeqCst), 1);
    assert_eq!(anim.sink().content(), "--");

    anim.stop();
    anim.reset();
    assert_eq!(WARNINGS.load(Ordering::SeqCst), 1);
}
