//! Warning collector for recoverable generation conditions.

/// Accumulates human-readable warnings for the diagnostics report. Every push
/// is mirrored to the `tracing` log; the generation pipeline itself never
/// fails for a warnable condition.
#[derive(Debug, Default, Clone)]
pub struct Warnings {
    items: Vec<String>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "jiggen", "{message}");
        self.items.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
