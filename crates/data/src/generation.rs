//! Per-visitor load generations.
//!
//! Every page entry starts a new generation for the visitor's page key. A
//! load that finishes after a newer one has started is stale: its snapshot
//! must not overwrite the newer one.

use std::time::Duration;

use moka::future::Cache;

/// Generation counters keyed by visitor page key.
#[derive(Clone)]
pub struct Generations {
    counters: Cache<String, u64>,
}

impl Generations {
    /// Counters for up to `capacity` visitors, each forgotten after `idle`.
    #[must_use]
    pub fn new(capacity: u64, idle: Duration) -> Self {
        Self {
            counters: Cache::builder()
                .max_capacity(capacity)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// Start a new load for `key` and return its generation.
    pub async fn begin(&self, key: &str) -> u64 {
        self.counters
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let next = existing.map_or(1, |entry| entry.into_value() + 1);
                std::future::ready(next)
            })
            .await
            .into_value()
    }

    /// Whether `generation` is still the newest load for `key`.
    pub async fn is_current(&self, key: &str, generation: u64) -> bool {
        self.counters.get(key).await == Some(generation)
    }
}

impl Default for Generations {
    fn default() -> Self {
        Self::new(100_000, Duration::from_secs(60 * 60))
    }
}

impl std::fmt::Debug for Generations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generations")
            .field("entries", &self.counters.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_newer_load_supersedes_older() {
        let generations = Generations::default();
        let first = generations.begin("visitor-a").await;
        let second = generations.begin("visitor-a").await;

        assert!(second > first);
        assert!(!generations.is_current("visitor-a", first).await);
        assert!(generations.is_current("visitor-a", second).await);
    }

    #[tokio::test]
    async fn test_visitors_are_independent() {
        let generations = Generations::default();
        let a = generations.begin("visitor-a").await;
        let b = generations.begin("visitor-b").await;
        generations.begin("visitor-a").await;

        assert!(!generations.is_current("visitor-a", a).await);
        assert!(generations.is_current("visitor-b", b).await);
        assert!(!generations.is_current("visitor-c", 1).await);
    }
}
