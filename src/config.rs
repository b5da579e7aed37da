//! Runner configuration.

use std::time::{Duration, Instant};

use t262_core::strings::MAX_STRING_LENGTH;

use crate::runtime::ExecutionLimits;

pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CALL_DEPTH: usize = 200;
/// Upper bound for `max_call_depth`. Larger requests are clamped to it.
pub const MAX_CALL_DEPTH: usize = 10_000;
/// Initial stack for the thread a fixture runs on. Deep evaluation grows the stack on demand beyond this.
pub const DEFAULT_STACK_SIZE: usize = 64 * 1024 * 1024;

/// Limits applied to every fixture run.
///
/// ## Examples
/// ```rust
/// use std::time::Duration;
/// use t262::config::RunnerConfig;
///
/// let config = RunnerConfig::default().with_max_steps(10_000).with_timeout(Some(Duration::from_millis(500)));
/// assert_eq!(config.max_steps, 10_000);
/// assert_eq!(config.max_call_depth, 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Statements and calls a run may execute before it is stopped.
    pub max_steps: u64,
    /// Wall-clock budget per run; `None` disables it.
    pub timeout: Option<Duration>,
    /// Nested script calls allowed before a `RangeError` is thrown, at most [`MAX_CALL_DEPTH`].
    pub max_call_depth: usize,
    /// Longest string a run may build, in UTF-16 code units.
    pub max_string_length: usize,
    pub stack_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            timeout: Some(DEFAULT_TIMEOUT),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            max_string_length: MAX_STRING_LENGTH,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RunnerConfig {
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth.min(MAX_CALL_DEPTH);
        self
    }

    pub fn with_max_string_length(mut self, max_string_length: usize) -> Self {
        self.max_string_length = max_string_length;
        self
    }

    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    /// Interpreter limits for a run starting at `start`.
    pub fn limits(&self, start: Instant) -> ExecutionLimits {
        ExecutionLimits {
            max_steps: self.max_steps,
            deadline: self.timeout.and_then(|timeout| start.checked_add(timeout)),
            max_call_depth: self.max_call_depth.min(MAX_CALL_DEPTH),
            max_string_length: self.max_string_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_follow_config() {
        let start = Instant::now();
        let limits = RunnerConfig::default().with_max_call_depth(7).limits(start);
        assert_eq!(limits.max_call_depth, 7);
        assert_eq!(limits.max_steps, DEFAULT_MAX_STEPS);
        assert_eq!(limits.deadline, Some(start + DEFAULT_TIMEOUT));

        let unbounded = RunnerConfig::default().with_timeout(None).limits(start);
        assert_eq!(unbounded.deadline, None);
    }

    #[test]
    fn test_call_depth_is_clamped() {
        let config = RunnerConfig::default().with_max_call_depth(1_000_000);
        assert_eq!(config.max_call_depth, MAX_CALL_DEPTH);

        // Struct literals bypass the builder; `limits` clamps again.
        let literal = RunnerConfig {
            max_call_depth: usize::MAX,
            ..RunnerConfig::default()
        };
        assert_eq!(literal.limits(Instant::now()).max_call_depth, MAX_CALL_DEPTH);
    }

    #[test]
    fn test_string_length_follows_config() {
        let limits = RunnerConfig::default().with_max_string_length(64).limits(Instant::now());
        assert_eq!(limits.max_string_length, 64);
        assert_eq!(RunnerConfig::default().max_string_length, MAX_STRING_LENGTH);
    }
}
