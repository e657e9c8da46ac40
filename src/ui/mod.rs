//! Terminal output helpers

pub mod progress;

/// Human-readable byte size: `512.0B`, `1.5KB`, `21.3MB`
pub fn format_size(bytes: u64) -> String {
  let mut value = bytes as f64;
  for unit in ["B", "KB", "MB", "GB"] {
    if value < 1024.0 {
      return format!("{:.1}{}", value, unit);
    }
    value /= 1024.0;
  }
  format!("{:.1}TB", value)
}
