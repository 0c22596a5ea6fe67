//! Render targets.

/// Anything that can display a line of text.
pub trait RenderSink {
    fn set_content(&mut self, text: &str);
}

impl RenderSink for String {
    fn set_content(&mut self, text: &str) {
        self.clear();
        self.push_str(text);
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn set_content(&mut self, text: &str) {
        (**self).set_content(text);
    }
}

/// Resolves a target identifier (e.g. an element id) to a sink.
pub trait TargetResolver {
    type Sink: RenderSink;

    fn resolve(&mut self, id: &str) -> Option<Self::Sink>;
}

/// In-memory sink that remembers the current content and counts writes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySink {
    content: String,
    writes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of `set_content` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl RenderSink for MemorySink {
    fn set_content(&mut self, text: &str) {
        self.content.clear();
        self.content.push_str(text);
        self.writes += 1;
    }
}
