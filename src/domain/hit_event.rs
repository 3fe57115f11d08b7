//! Hit event model for asynchronous hit counting.

/// A successful resolution of a short code, queued for hit counting.
///
/// Resolve paths hand these to a bounded channel with `try_send` so the
/// response never waits on the counter update; when the queue is full the
/// event is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitEvent {
    pub short_code: String,
}

impl HitEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}
