use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

/// How the scraper waits for the page to settle after an action.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn settle(&self, base: Duration);
}

/// Sleeps for `base` plus a random jitter drawn from `[min, max]` milliseconds.
pub struct JitteredPacer {
    jitter_min_ms: u64,
    jitter_max_ms: u64,
}

impl JitteredPacer {
    pub fn new(jitter_min_ms: u64, jitter_max_ms: u64) -> Self {
        JitteredPacer {
            jitter_min_ms: jitter_min_ms.min(jitter_max_ms),
            jitter_max_ms: jitter_max_ms.max(jitter_min_ms),
        }
    }

    pub fn delay_for(&self, base: Duration) -> Duration {
        let jitter = match self.jitter_max_ms {
            0 => 0,
            _ => rand::thread_rng().gen_range(self.jitter_min_ms..=self.jitter_max_ms),
        };
        base + Duration::from_millis(jitter)
    }
}

#[async_trait]
impl Pacer for JitteredPacer {
    async fn settle(&self, base: Duration) {
        tokio::time::sleep(self.delay_for(base)).await;
    }
}

/// Never waits.
pub struct Immediate;

#[async_trait]
impl Pacer for Immediate {
    async fn settle(&self, _base: Duration) {}
}
