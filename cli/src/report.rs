use serde::Serialize;
use tailbuf_core::RingBuffer;

/// Snapshot of a ring after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub stream: String,
    pub written: u64,
    pub retained: usize,
    pub dropped: u64,
    pub capacity: usize,
    pub max_capacity: usize,
    pub wrapped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail: Option<String>,
}

impl Summary {
    pub fn from_ring(stream: &str, ring: &RingBuffer) -> Self {
        let retained = ring.len();
        Self {
            stream: stream.to_string(),
            written: ring.written(),
            retained,
            dropped: ring.written().saturating_sub(retained as u64),
            capacity: ring.capacity(),
            max_capacity: ring.max_capacity(),
            wrapped: ring.is_wrapped(),
            tail: None,
        }
    }

    pub fn with_tail(mut self, ring: &RingBuffer) -> Self {
        self.tail = Some(ring.to_string());
        self
    }

    pub fn render_line(&self) -> String {
        format!(
            "{}: {} bytes written, {} retained, {} dropped (capacity {}/{})",
            self.stream, self.written, self.retained, self.dropped, self.capacity, self.max_capacity
        )
    }
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub exit_code: i32,
    pub stdout: Summary,
    pub stderr: Summary,
}
