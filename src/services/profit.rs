//! Profit reporting

use crate::{
    cache::ResponseCache,
    error::AppResult,
    models::profit::{ProfitEntry, ProfitSummary},
    repository::Repository,
};

use super::cache_keys;

#[derive(Clone)]
pub struct ProfitService {
    repository: Repository,
    cache: ResponseCache,
}

impl ProfitService {
    pub fn new(repository: Repository, cache: ResponseCache) -> Self {
        Self { repository, cache }
    }

    /// Sum of all ledger entries
    pub async fn total(&self) -> AppResult<ProfitSummary> {
        if let Some(cached) = self.cache.get(cache_keys::PROFIT_TOTAL).await {
            return Ok(cached);
        }
        let summary = ProfitSummary {
            total_profit: self.repository.profits.total().await?,
        };
        self.cache.insert(cache_keys::PROFIT_TOTAL, &summary).await;
        Ok(summary)
    }

    pub async fn entries(&self) -> AppResult<Vec<ProfitEntry>> {
        self.repository.profits.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn empty_ledger_totals_zero() {
        let repository = Repository::new(Arc::new(MemoryStore::new()));
        let service = ProfitService::new(repository, ResponseCache::disabled());
        assert_eq!(service.total().await.unwrap().total_profit, 0);
        assert!(service.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn total_sums_entries_after_invalidation() {
        let repository = Repository::new(Arc::new(MemoryStore::new()));
        let cache = ResponseCache::new(Duration::from_secs(60));
        let service = ProfitService::new(repository.clone(), cache.clone());

        repository.profits.append("r1", 150_000).await.unwrap();
        assert_eq!(service.total().await.unwrap().total_profit, 150_000);

        repository.profits.append("r2", 40_000).await.unwrap();
        // still served from cache until a writer invalidates
        assert_eq!(service.total().await.unwrap().total_profit, 150_000);

        cache.invalidate(Some(cache_keys::PROFIT)).await;
        assert_eq!(service.total().await.unwrap().total_profit, 190_000);
        assert_eq!(service.entries().await.unwrap().len(), 2);
    }
}
