use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock timer for one strategy attempt. Logs on drop.
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    pub fn start(label: &'static str) -> Self {
        debug!("⏱  {}: started", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱  {}: took {:.2?}", self.label, self.start.elapsed());
    }
}

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 token, e.g. for synthetic seller names.
pub fn random_base36(len: usize) -> String {
    (0..len)
        .map(|_| BASE36[rand::random_range(0..BASE36.len())] as char)
        .collect()
}
