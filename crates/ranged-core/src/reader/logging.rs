//! Pass-through `ReadAt` that traces every call.

use super::ReadAt;
use crate::error::Result;

/// Forwards every call to the wrapped reader unchanged and emits a `tracing`
/// debug event with the offset, requested length and outcome.
#[derive(Debug, Clone)]
pub struct LoggingReader<R> {
    inner: R,
}

impl<R> LoggingReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: ReadAt> ReadAt for LoggingReader<R> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize> {
        let requested = buf.len();
        let result = self.inner.read_at(buf, offset);
        match &result {
            Ok(read) => tracing::debug!(offset, requested, read, "read_at"),
            Err(e) => tracing::debug!(offset, requested, error = %e, "read_at failed"),
        }
        result
    }

    fn size(&self) -> u64 {
        self.inner.size()
    }
}
