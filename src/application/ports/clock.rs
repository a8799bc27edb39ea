use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

/// Time source for polling loops, injectable so waits are testable.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}
