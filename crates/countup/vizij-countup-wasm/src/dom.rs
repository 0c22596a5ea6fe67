//! DOM render targets and console diagnostics.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, HtmlElement};

use vizij_countup_core::{RenderSink, TargetResolver};

/// Writes the counter text into an element's `innerHTML`.
pub struct ElementSink {
    el: HtmlElement,
}

impl ElementSink {
    pub fn new(el: HtmlElement) -> Self {
        Self { el }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.el
    }
}

impl RenderSink for ElementSink {
    fn set_content(&mut self, text: &str) {
        self.el.set_inner_html(text);
    }
}

/// Looks elements up by id.
pub struct DocumentResolver {
    document: Document,
}

impl DocumentResolver {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

impl TargetResolver for DocumentResolver {
    type Sink = ElementSink;

    fn resolve(&mut self, id: &str) -> Option<ElementSink> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
            .map(ElementSink::new)
    }
}

/// `log` backend printing to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&record.args().to_string());
        match record.level() {
            Level::Error => console::error_1(&msg),
            Level::Warn => console::warn_1(&msg),
            Level::Info => console::info_1(&msg),
            Level::Debug | Level::Trace => console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Install the console logger (first call wins) and the panic hook.
pub fn init_diagnostics(level: LevelFilter) {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
