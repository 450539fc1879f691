//! Tracing and logging (shared setup).

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::LogOutput;

/// Initialize process-wide logging with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogOutput::Json);
}

/// Initialize process-wide logging with the given output format.
pub fn init_with(output: LogOutput) {
    tracing::init(output);
}
