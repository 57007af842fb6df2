use crate::error::BoxError;
use crate::sink::LineSink;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// A sink that keeps every line in memory.
///
/// Clones share the same buffer, so one handle can be given to the driver
/// while another inspects the output.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines written so far, in order.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// All lines concatenated, exactly as a terminal would receive them.
    pub fn contents(&self) -> String {
        self.guard().concat()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        // a poisoned buffer still holds every line written before the panic
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LineSink for MemorySink {
    async fn write_line(&self, line: &str) -> Result<(), BoxError> {
        self.guard().push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write_line("a\n").await.unwrap();
        sink.write_line("b\n").await.unwrap();
        assert_eq!(handle.lines(), vec!["a\n".to_string(), "b\n".to_string()]);
        assert_eq!(handle.contents(), "a\nb\n");
    }
}
