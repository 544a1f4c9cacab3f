use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep, Duration, Instant};
use parking_lot::Mutex;

use crate::external::market_data::ProviderError;

/// Throttles outbound market data requests.
///
/// Quote fan-outs hit the provider once per symbol at the same moment; this
/// keeps them inside a free tier quota (Finnhub allows 60 calls per minute).
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    last_request: Arc<Mutex<Instant>>,
    min_delay: Duration,
}

impl RateLimiter {
    /// * `max_concurrent` - requests allowed in flight at once
    /// * `requests_per_minute` - spacing target between request starts
    pub fn new(max_concurrent: usize, requests_per_minute: u32) -> Self {
        let min_delay_ms = 60_000 / requests_per_minute.max(1) as u64;
        let now = Instant::now();
        let long_ago = now.checked_sub(Duration::from_secs(60)).unwrap_or(now);
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Arc::new(Mutex::new(long_ago)),
            min_delay: Duration::from_millis(min_delay_ms),
        }
    }

    /// Wait for a free slot and for the minimum spacing since the previous
    /// request. The slot is released when the guard is dropped.
    pub async fn acquire(&self) -> Result<RateLimitGuard, ProviderError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| ProviderError::Network(format!("rate limiter closed: {}", e)))?;

        // Reserve the next start slot under the lock, sleep outside it
        let wait_until = {
            let mut last = self.last_request.lock();
            let next = (*last + self.min_delay).max(Instant::now());
            *last = next;
            next
        };

        if wait_until > Instant::now() {
            sleep(wait_until - Instant::now()).await;
        }

        Ok(RateLimitGuard { _permit: permit })
    }

    #[allow(dead_code)]
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }
}

pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant as StdInstant;

    #[tokio::test]
    async fn test_rate_limiter_enforces_delay() {
        // 60 per minute = one per second
        let limiter = RateLimiter::new(2, 60);

        let start = StdInstant::now();

        let guard1 = limiter.acquire().await.unwrap();
        assert!(start.elapsed().as_millis() < 100, "First request should be immediate");
        drop(guard1);

        let _guard2 = limiter.acquire().await.unwrap();
        assert!(start.elapsed().as_millis() >= 900, "Second request should wait ~1 second");
    }

    #[tokio::test]
    async fn test_guard_releases_permit() {
        let limiter = RateLimiter::new(2, 6000);

        let guard = limiter.acquire().await.unwrap();
        assert_eq!(limiter.available_permits(), 1);
        drop(guard);
        assert_eq!(limiter.available_permits(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_limit() {
        let limiter = Arc::new(RateLimiter::new(2, 6000));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move {
                    let _guard = limiter.acquire().await.unwrap();
                    sleep(Duration::from_millis(50)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(limiter.available_permits(), 2);
    }
}
