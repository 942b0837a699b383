use std::time::Duration;

/// Blocks the dispatch thread to let the OS settle before re-querying it.
/// Deliberate latency, not a synchronization primitive: every sleep is short,
/// bounded, and stalls notification processing for its duration.
pub(crate) fn settle_sleep(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}
