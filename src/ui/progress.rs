//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars

use linya::{Bar, Progress};
use std::io::{self, Read};

/// Progress bar over a byte count
pub struct ByteProgress {
  progress: Progress,
  bar: Bar,
}

impl ByteProgress {
  /// Create a new progress bar for `total` bytes
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Advance by `n` bytes
  pub fn inc(&mut self, n: usize) {
    self.progress.inc_and_draw(&self.bar, n);
  }
}

/// Reader that draws a progress bar as it is consumed
///
/// Wraps an upload body so the bar tracks what the HTTP client has actually
/// pulled off the reader.
pub struct ProgressReader<R> {
  inner: R,
  progress: ByteProgress,
}

impl<R: Read> ProgressReader<R> {
  pub fn new(inner: R, total: usize, label: impl Into<String>) -> Self {
    Self {
      inner,
      progress: ByteProgress::new(total, label),
    }
  }
}

impl<R: Read> Read for ProgressReader<R> {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    let n = self.inner.read(buf)?;
    if n > 0 {
      self.progress.inc(n);
    }
    Ok(n)
  }
}
