// file: src/utils/telemetry.rs
// description: Lightweight operation timing for indexing, retrieval and generation
// reference: tracing spans and log-based timing

use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Logs the duration of a named pipeline stage.
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish_with_count(self, count: usize, unit: &str) -> Duration {
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs_f64();
        debug!(
            "Completed operation: {} - {} {} in {:.3}s ({:.1} {}/sec)",
            self.operation,
            count,
            unit,
            secs,
            if secs > 0.0 { count as f64 / secs } else { 0.0 },
            unit
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}]: took {:.2}s (threshold: {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test");
        std::thread::sleep(Duration::from_millis(10));
        let elapsed = timer.finish_with_count(1, "items");
        assert!(elapsed >= Duration::from_millis(10));
    }

    #[test]
    fn test_finish_with_count_returns_elapsed() {
        let timer = OperationTimer::new("index");
        timer.warn_if_slow(Duration::from_secs(60));
        let elapsed = timer.finish_with_count(0, "documents");
        assert!(elapsed < Duration::from_secs(60));
    }
}
