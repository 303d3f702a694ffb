//! In-memory search index
//!
//! Case-insensitive substring matching over sku, name and description.
//! Documents are kept by id so upserts replace earlier versions. The index
//! can be switched offline and counts the searches it serves.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{SearchError, SearchResult};
use crate::models::ProductDocument;
use crate::search::{SearchHits, SearchIndex};

#[derive(Debug)]
pub struct InMemorySearchIndex {
    documents: RwLock<BTreeMap<i32, ProductDocument>>,
    available: AtomicBool,
    searches: AtomicUsize,
}

impl Default for InMemorySearchIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            searches: AtomicUsize::new(0),
        }
    }

    /// Simulates the index going offline (false) or coming back (true).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of search calls attempted so far, failed ones included.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Snapshot of the indexed documents, ordered by id.
    pub async fn documents(&self) -> Vec<ProductDocument> {
        self.documents.read().await.values().cloned().collect()
    }

    fn ensure_available(&self) -> SearchResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SearchError::Unreachable(
                "in-memory index is offline".to_string(),
            ))
        }
    }
}

fn document_matches(doc: &ProductDocument, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&doc.sku)
        || contains(&doc.name)
        || doc.description.as_deref().is_some_and(contains)
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn search(&self, query: &str, limit: u32, offset: u32) -> SearchResult<SearchHits> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;

        let needle = query.trim().to_lowercase();
        let documents = self.documents.read().await;
        let matching: Vec<&ProductDocument> = documents
            .values()
            .filter(|doc| document_matches(doc, &needle))
            .collect();

        Ok(SearchHits {
            estimated_total: matching.len() as u64,
            hits: matching
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .cloned()
                .collect(),
        })
    }

    async fn upsert_documents(&self, documents: &[ProductDocument]) -> SearchResult<()> {
        self.ensure_available()?;

        let mut stored = self.documents.write().await;
        for doc in documents {
            stored.insert(doc.id, doc.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i32, name: &str) -> ProductDocument {
        ProductDocument {
            id,
            sku: format!("SKU{:06}", id),
            name: name.to_string(),
            description: Some(format!("Description for {}", name)),
            price: 10.0,
            category_id: None,
            category_name: None,
        }
    }

    #[tokio::test]
    async fn test_search_matches_case_insensitively() {
        let index = InMemorySearchIndex::new();
        index
            .upsert_documents(&[doc(1, "Phone 1"), doc(2, "Laptop 2"), doc(3, "phone case")])
            .await
            .unwrap();

        let result = index.search("PHONE", 10, 0).await.unwrap();
        assert_eq!(result.estimated_total, 2);
        assert_eq!(result.hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_pages_hits() {
        let index = InMemorySearchIndex::new();
        let docs: Vec<_> = (1..=5).map(|i| doc(i, "Lamp")).collect();
        index.upsert_documents(&docs).await.unwrap();

        let result = index.search("lamp", 2, 4).await.unwrap();
        assert_eq!(result.estimated_total, 5);
        assert_eq!(result.hits.len(), 1);
        assert_eq!(result.hits[0].id, 5);
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let index = InMemorySearchIndex::new();
        index.upsert_documents(&[doc(1, "Old")]).await.unwrap();
        index.upsert_documents(&[doc(1, "New")]).await.unwrap();

        let documents = index.documents().await;
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "New");
    }

    #[tokio::test]
    async fn test_offline_index_fails() {
        let index = InMemorySearchIndex::new();
        index.set_available(false);

        let result = index.search("phone", 5, 0).await;
        assert!(matches!(result, Err(SearchError::Unreachable(_))));
        assert_eq!(index.search_count(), 1);
    }
}
