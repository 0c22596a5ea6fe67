use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Number};
use log::{warn, LevelFilter};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use vizij_countup_core::{Animator, CountConfig, CountUpOptions, FrameReport};

pub mod dom;
pub mod raf;

pub use dom::{init_diagnostics, DocumentResolver, ElementSink};
pub use raf::RafScheduler;

type DomAnimator = Animator<ElementSink, RafScheduler>;

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Host `Number(value)` coercion.
fn coerce(v: &JsValue) -> f64 {
    Number::new(v).value_of()
}

/// JS callbacks from the last `start`. Kept outside the animator so they
/// run after its borrow is released and may call back into the `CountUp`.
#[derive(Default)]
struct JsCallbacks {
    progress: Option<Function>,
    complete: Option<Function>,
}

fn dispatch(callbacks: &RefCell<JsCallbacks>, report: FrameReport) {
    if let Some(value) = report.rendered {
        let progress = callbacks.borrow().progress.clone();
        if let Some(f) = progress {
            if let Err(err) = f.call1(&JsValue::UNDEFINED, &JsValue::from_f64(value)) {
                warn!("countup: progress callback threw: {err:?}");
            }
        }
    }
    if report.completed {
        let complete = callbacks.borrow().complete.clone();
        if let Some(f) = complete {
            if let Err(err) = f.call0(&JsValue::UNDEFINED) {
                warn!("countup: complete callback threw: {err:?}");
            }
        }
    }
}

/// Animated number bound to a DOM element.
#[wasm_bindgen]
pub struct CountUp {
    inner: Rc<RefCell<DomAnimator>>,
    callbacks: Rc<RefCell<JsCallbacks>>,
}

#[wasm_bindgen]
impl CountUp {
    /// `new CountUp(target, startVal, endVal, decimals?, duration?, options?)`
    ///
    /// `target` is an element id or an element. `duration` is in seconds.
    /// `options` may set any of `useEasing`, `useGrouping`, `separator`,
    /// `decimal`; the rest keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        target: JsValue,
        start_val: JsValue,
        end_val: JsValue,
        decimals: Option<f64>,
        duration: Option<f64>,
        options: JsValue,
    ) -> Result<CountUp, JsError> {
        Self::build(target, start_val, end_val, decimals, duration, options, false)
    }

    /// Same arguments as the constructor, but frames always come from the
    /// ~60 Hz `setTimeout` loop, even where `requestAnimationFrame` exists.
    #[wasm_bindgen(js_name = withTimerFallback)]
    pub fn with_timer_fallback(
        target: JsValue,
        start_val: JsValue,
        end_val: JsValue,
        decimals: Option<f64>,
        duration: Option<f64>,
        options: JsValue,
    ) -> Result<CountUp, JsError> {
        Self::build(target, start_val, end_val, decimals, duration, options, true)
    }

    /// Start counting. Always returns `false`; bad bounds show `--` and log a
    /// console warning instead of throwing.
    pub fn start(
        &self,
        on_progress: Option<Function>,
        on_complete: Option<Function>,
    ) -> Result<bool, JsError> {
        self.callbacks.replace(JsCallbacks {
            progress: on_progress,
            complete: on_complete,
        });
        self.with_animator(|anim| {
            // Failure is already rendered and logged.
            let _ = anim.start(None, None);
            false
        })
    }

    pub fn stop(&self) -> Result<(), JsError> {
        self.with_animator(|anim| anim.stop())
    }

    pub fn reset(&self) -> Result<(), JsError> {
        self.with_animator(|anim| anim.reset())
    }

    /// `resume()` continues towards the current end; `resume(newEnd, seconds)`
    /// retargets.
    pub fn resume(&self, new_end_val: Option<f64>, duration: Option<f64>) -> Result<(), JsError> {
        self.with_animator(|anim| {
            let _ = anim.resume(new_end_val, duration);
        })
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> Result<bool, JsError> {
        self.with_animator(|anim| anim.is_running())
    }

    #[wasm_bindgen(js_name = frameValue)]
    pub fn frame_value(&self) -> Result<f64, JsError> {
        self.with_animator(|anim| anim.frame_value())
    }

    #[wasm_bindgen(js_name = usesTimerFallback)]
    pub fn uses_timer_fallback(&self) -> Result<bool, JsError> {
        self.with_animator(|anim| anim.scheduler().uses_timer_fallback())
    }
}

impl CountUp {
    fn build(
        target: JsValue,
        start_val: JsValue,
        end_val: JsValue,
        decimals: Option<f64>,
        duration: Option<f64>,
        options: JsValue,
        timer_fallback: bool,
    ) -> Result<CountUp, JsError> {
        init_diagnostics(LevelFilter::Warn);

        let options: CountUpOptions = if jsvalue_is_undefined_or_null(&options) {
            CountUpOptions::default()
        } else {
            swb::from_value(options).map_err(|e| JsError::new(&format!("options error: {e}")))?
        };
        let cfg = CountConfig {
            start_value: coerce(&start_val),
            end_value: coerce(&end_val),
            decimals: decimals.filter(|d| d.is_finite()).map_or(0, |d| d as i32),
            duration_secs: duration,
            options,
        };

        let window = web_sys::window().ok_or_else(|| JsError::new("no window available"))?;
        let scheduler = if timer_fallback {
            RafScheduler::with_timer_fallback(window.clone())
        } else {
            RafScheduler::new(window.clone())
        };
        let anim = if let Some(id) = target.as_string() {
            let document = window
                .document()
                .ok_or_else(|| JsError::new("no document available"))?;
            let mut resolver = DocumentResolver::new(document);
            Animator::from_target_id(&mut resolver, &id, scheduler, cfg)
                .map_err(|e| JsError::new(&e.to_string()))?
        } else {
            let el = target
                .dyn_into::<HtmlElement>()
                .map_err(|_| JsError::new("target must be an element id or an HTMLElement"))?;
            Animator::new(ElementSink::new(el), scheduler, cfg)
        };

        let inner = Rc::new(RefCell::new(anim));
        let callbacks = Rc::new(RefCell::new(JsCallbacks::default()));
        let weak = Rc::downgrade(&inner);
        let weak_callbacks = Rc::downgrade(&callbacks);
        let on_frame = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            let (Some(inner), Some(callbacks)) = (weak.upgrade(), weak_callbacks.upgrade()) else {
                return;
            };
            let report = match inner.try_borrow_mut() {
                Ok(mut anim) => anim.advance(timestamp),
                Err(_) => {
                    warn!("countup: frame delivered while busy, dropped");
                    None
                }
            };
            if let Some(report) = report {
                dispatch(&callbacks, report);
            }
        });
        inner.borrow_mut().scheduler_mut().set_callback(on_frame);

        Ok(CountUp { inner, callbacks })
    }

    fn with_animator<T>(&self, f: impl FnOnce(&mut DomAnimator) -> T) -> Result<T, JsError> {
        let mut anim = self
            .inner
            .try_borrow_mut()
            .map_err(|_| JsError::new("CountUp is busy"))?;
        Ok(f(&mut anim))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
