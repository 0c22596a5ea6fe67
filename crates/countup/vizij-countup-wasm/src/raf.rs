//! Browser frame scheduling: `requestAnimationFrame` when the host has it
//! (prefixed aliases included), otherwise a ~60 Hz `setTimeout` loop.

use js_sys::{Date, Function, Reflect};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use vizij_countup_core::{FrameHandle, FrameScheduler, FRAME_INTERVAL_MS};

pub type FrameCallback = Closure<dyn FnMut(f64)>;

const VENDOR_PREFIXES: [&str; 3] = ["webkit", "moz", "ms"];

enum FrameApi {
    Native { request: Function, cancel: Function },
    Timer { last_time: f64 },
}

pub struct RafScheduler {
    window: Window,
    api: FrameApi,
    callback: Option<FrameCallback>,
}

fn window_fn(window: &Window, name: &str) -> Option<Function> {
    Reflect::get(window, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// First request/cancel pair found, unprefixed names first.
fn detect_native(window: &Window) -> Option<(Function, Function)> {
    if let (Some(request), Some(cancel)) = (
        window_fn(window, "requestAnimationFrame"),
        window_fn(window, "cancelAnimationFrame"),
    ) {
        return Some((request, cancel));
    }
    VENDOR_PREFIXES.iter().find_map(|prefix| {
        let request = window_fn(window, &format!("{prefix}RequestAnimationFrame"))?;
        let cancel = window_fn(window, &format!("{prefix}CancelAnimationFrame"))
            .or_else(|| window_fn(window, &format!("{prefix}CancelRequestAnimationFrame")))?;
        Some((request, cancel))
    })
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        let api = match detect_native(&window) {
            Some((request, cancel)) => FrameApi::Native { request, cancel },
            None => FrameApi::Timer { last_time: 0.0 },
        };
        Self {
            window,
            api,
            callback: None,
        }
    }

    /// Force the `setTimeout` path even when animation frames are available.
    pub fn with_timer_fallback(window: Window) -> Self {
        Self {
            window,
            api: FrameApi::Timer { last_time: 0.0 },
            callback: None,
        }
    }

    /// The closure the host calls with each frame timestamp.
    pub fn set_callback(&mut self, callback: FrameCallback) {
        self.callback = Some(callback);
    }

    pub fn uses_timer_fallback(&self) -> bool {
        matches!(self.api, FrameApi::Timer { .. })
    }

    fn try_request(&mut self) -> Result<FrameHandle, JsValue> {
        let callback = self
            .callback
            .as_ref()
            .ok_or_else(|| JsValue::from_str("frame callback not installed"))?;
        let f: &Function = callback.as_ref().unchecked_ref();
        match &mut self.api {
            FrameApi::Native { request, .. } => {
                let id = request.call1(&self.window, f)?;
                Ok(FrameHandle(id.as_f64().unwrap_or(0.0) as u32))
            }
            FrameApi::Timer { last_time } => {
                let now = Date::now();
                let wait = (FRAME_INTERVAL_MS - (now - *last_time)).max(0.0);
                let id = self
                    .window
                    .set_timeout_with_callback_and_timeout_and_arguments_1(
                        f,
                        wait as i32,
                        &JsValue::from_f64(now + wait),
                    )?;
                *last_time = now + wait;
                Ok(FrameHandle(id as u32))
            }
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.try_request().unwrap_or_else(|err| {
            warn!("countup: frame request failed: {err:?}");
            FrameHandle(0)
        })
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if handle.0 == 0 {
            return;
        }
        match &self.api {
            FrameApi::Native { cancel, .. } => {
                if let Err(err) = cancel.call1(&self.window, &JsValue::from(handle.0)) {
                    warn!("countup: frame cancel failed: {err:?}");
                }
            }
            FrameApi::Timer { .. } => self.window.clear_timeout_with_handle(handle.0 as i32),
        }
    }
}
