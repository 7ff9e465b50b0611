use basalt_runtime::StdThreading;
use std::time::Duration;

/// Back-off tuned for benchmarking: long enough to exercise the sleep path,
/// short enough that a stalled worker costs microseconds, not wall-clock.
pub fn quick_polling() -> StdThreading {
    StdThreading {
        poll_interval: Duration::from_micros(10),
    }
}

/// An 8-byte token payload for channel microbenches.
pub fn test_token(value: u64) -> [u8; 8] {
    value.to_ne_bytes()
}
