//! In-memory storage implementation for testing and development.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::common::ExtractedDataId;
use crate::domains::extraction::{
    ExtractedData, ExtractedDataSearch, ExtractedEntities, NewExtractedData,
};
use crate::error::{ExtractionError, Result};
use crate::kernel::BaseExtractedDataStore;

/// In-memory extraction runs.
///
/// Mirrors the PostgreSQL store: ids start at 1, results are ordered newest
/// first with ties broken by id, and `insert` stamps `created_at` from the
/// store's own clock. Data is lost on restart.
pub struct MemoryExtractedDataStore {
    records: RwLock<Vec<ExtractedData>>,
    next_id: AtomicI64,
    find_calls: AtomicUsize,
}

impl Default for MemoryExtractedDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryExtractedDataStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
            find_calls: AtomicUsize::new(0),
        }
    }

    /// Number of stored runs.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All stored runs, oldest first.
    pub fn records(&self) -> Vec<ExtractedData> {
        self.read().clone()
    }

    /// Number of `find` calls served so far.
    pub fn find_count(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Store a run with an arbitrary timestamp (e.g. an already stale one).
    pub fn seed(&self, new: NewExtractedData, created_at: DateTime<Utc>) -> ExtractedData {
        let record = ExtractedData {
            id: ExtractedDataId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            url: new.url,
            people: new.people,
            companies: new.companies,
            created_at,
            updated_at: created_at,
        };
        self.write().push(record.clone());
        record
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ExtractedData>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ExtractedData>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_cancelled(cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(ExtractionError::Cancelled);
        }
        Ok(())
    }
}

fn newest_first(a: &ExtractedData, b: &ExtractedData) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

#[async_trait]
impl BaseExtractedDataStore for MemoryExtractedDataStore {
    async fn insert(
        &self,
        new: &NewExtractedData,
        cancel: &CancellationToken,
    ) -> Result<ExtractedData> {
        Self::check_cancelled(cancel)?;
        new.validate()?;
        Ok(self.seed(new.clone(), Utc::now()))
    }

    async fn get_last_by_url(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        Self::check_cancelled(cancel)?;
        if url.trim().is_empty() {
            return Err(ExtractionError::invalid_argument("url must not be empty"));
        }

        Ok(self
            .read()
            .iter()
            .filter(|r| r.url == url)
            .min_by(|a, b| newest_first(a, b))
            .cloned())
    }

    async fn find(
        &self,
        search: &ExtractedDataSearch,
        cancel: &CancellationToken,
    ) -> Result<Vec<ExtractedData>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Self::check_cancelled(cancel)?;

        let mut matching: Vec<ExtractedData> = self
            .read()
            .iter()
            .filter(|r| search.matches(r))
            .cloned()
            .collect();
        matching.sort_by(newest_first);

        let offset = usize::try_from(search.offset).unwrap_or(0);
        let limit = search
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_by_id(
        &self,
        id: ExtractedDataId,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        Self::check_cancelled(cancel)?;
        if id.is_unset() {
            return Err(ExtractionError::invalid_argument("id must be set"));
        }

        Ok(self.read().iter().find(|r| r.id == id).cloned())
    }

    async fn update_by_id(
        &self,
        id: ExtractedDataId,
        entities: &ExtractedEntities,
        cancel: &CancellationToken,
    ) -> Result<Option<ExtractedData>> {
        Self::check_cancelled(cancel)?;
        if id.is_unset() {
            return Err(ExtractionError::invalid_argument("id must be set"));
        }

        let mut records = self.write();
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.people = entities.people.clone();
        record.companies = entities.companies.clone();
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn ping(&self, cancel: &CancellationToken) -> Result<()> {
        Self::check_cancelled(cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::extraction::Company;
    use chrono::Duration;

    fn new_record(url: &str) -> NewExtractedData {
        NewExtractedData {
            url: url.to_string(),
            people: Vec::new(),
            companies: vec![Company {
                name: Some("Acme".into()),
                ..Default::default()
            }],
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryExtractedDataStore::new();
        let cancel = CancellationToken::new();

        let first = store.insert(&new_record("https://a.com"), &cancel).await.unwrap();
        let second = store.insert(&new_record("https://a.com"), &cancel).await.unwrap();

        assert_eq!(first.id, ExtractedDataId::new(1));
        assert_eq!(second.id, ExtractedDataId::new(2));
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_empty_url() {
        let store = MemoryExtractedDataStore::new();
        let err = store
            .insert(&new_record(""), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidArgument(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_insert_stamps_created_at_with_store_clock() {
        let store = MemoryExtractedDataStore::new();
        let before = Utc::now();

        let record = store
            .insert(&new_record("https://a.com"), &CancellationToken::new())
            .await
            .unwrap();

        let after = Utc::now();
        assert!(record.created_at >= before && record.created_at <= after);
        assert_eq!(record.updated_at, record.created_at);
        assert_eq!(store.records()[0].created_at, record.created_at);
    }

    #[tokio::test]
    async fn test_get_last_by_url_picks_newest() {
        let store = MemoryExtractedDataStore::new();
        let now = Utc::now();
        store.seed(new_record("https://a.com"), now - Duration::hours(3));
        let newest = store.seed(new_record("https://a.com"), now);
        store.seed(new_record("https://b.com"), now + Duration::minutes(1));

        let found = store
            .get_last_by_url("https://a.com", &CancellationToken::new())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.id, newest.id);
    }

    #[tokio::test]
    async fn test_get_last_by_url_missing_is_none() {
        let store = MemoryExtractedDataStore::new();
        let found = store
            .get_last_by_url("https://never.com", &CancellationToken::new())
            .await
            .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_paginates_newest_first() {
        let store = MemoryExtractedDataStore::new();
        let now = Utc::now();
        for minutes in 0..5 {
            store.seed(new_record("https://a.com"), now - Duration::minutes(minutes));
        }

        let search = ExtractedDataSearch {
            url: "https://a.com".into(),
            limit: Some(2),
            offset: 1,
            ..Default::default()
        };
        let page = store.find(&search, &CancellationToken::new()).await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].created_at, now - Duration::minutes(1));
        assert_eq!(page[1].created_at, now - Duration::minutes(2));
        assert_eq!(store.find_count(), 1);
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let store = MemoryExtractedDataStore::new();
        let cancel = CancellationToken::new();
        let created = store.seed(new_record("https://a.com"), Utc::now() - Duration::hours(1));

        let entities = ExtractedEntities::default();
        let before = Utc::now();
        let updated = store
            .update_by_id(created.id, &entities, &cancel)
            .await
            .unwrap()
            .unwrap();

        assert!(updated.companies.is_empty());
        assert!(updated.updated_at >= before);
        assert_eq!(updated.created_at, created.created_at);

        let missing = store
            .update_by_id(ExtractedDataId::new(99), &entities, &cancel)
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_unset_id_rejected() {
        let store = MemoryExtractedDataStore::new();
        let err = store
            .get_by_id(ExtractedDataId::new(0), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let store = MemoryExtractedDataStore::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = store
            .insert(&new_record("https://a.com"), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractionError::Cancelled));
        assert!(store.is_empty());
    }
}
