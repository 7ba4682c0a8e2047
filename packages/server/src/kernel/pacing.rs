//! Pacing for streamed replies.
//!
//! Splits finished text into fixed-size code-point windows and owns the
//! delays between frames. Knows nothing about how the text was produced.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacingConfig {
    /// Code points per content frame. Zero is treated as one.
    pub chunk_size: usize,
    pub chunk_delay: Duration,
    pub init_pause: Duration,
    pub ready_pause: Duration,
    pub thinking_pause: Duration,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 25,
            chunk_delay: Duration::from_millis(30),
            init_pause: Duration::from_millis(100),
            ready_pause: Duration::from_millis(100),
            thinking_pause: Duration::from_millis(200),
        }
    }
}

impl PacingConfig {
    /// No delays at all, for tests.
    pub fn immediate(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            chunk_delay: Duration::ZERO,
            init_pause: Duration::ZERO,
            ready_pause: Duration::ZERO,
            thinking_pause: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pacer {
    config: PacingConfig,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PacingConfig {
        &self.config
    }

    pub fn chunks<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_code_points(text, self.config.chunk_size)
    }

    pub async fn after_chunk(&self) {
        pause(self.config.chunk_delay).await;
    }

    pub async fn after_init(&self) {
        pause(self.config.init_pause).await;
    }

    pub async fn after_ready(&self) {
        pause(self.config.ready_pause).await;
    }

    pub async fn after_thinking(&self) {
        pause(self.config.thinking_pause).await;
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Split `text` into consecutive windows of at most `size` code points.
///
/// Concatenating the windows gives back `text` exactly. Empty text yields no
/// windows.
pub fn split_code_points(text: &str, size: usize) -> Vec<&str> {
    let size = size.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (index, _) in text.char_indices() {
        if count == size {
            chunks.push(&text[start..index]);
            start = index;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}
