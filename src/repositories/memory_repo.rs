//! In-process document store used by the test suites.
//!
//! Documents live in per-collection vectors, so listing order is insertion
//! order, matching the sort the MongoDB backend applies.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document};
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::repositories::DocumentStore;

type CollectionMap = HashMap<String, Vec<Document>>;

#[derive(Default, Clone, Debug)]
pub struct MemoryRepo {
    store: Arc<RwLock<CollectionMap>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.store
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryRepo {
    async fn insert_document(&self, collection: &str, mut document: Document) -> StoreResult<Bson> {
        let id = match document.get("_id") {
            Some(id) => id.clone(),
            None => {
                let id = Bson::ObjectId(ObjectId::new());
                document.insert("_id", id.clone());
                id
            }
        };

        self.store
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(id)
    }

    async fn find_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: u32,
    ) -> StoreResult<Vec<Document>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|document| matches_filter(document, &filter))
                    .take(limit as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self.store.read().await.keys().cloned().collect();
        names.sort();

        Ok(names)
    }

    fn database_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn filters_by_equality_and_keeps_insertion_order() {
        let repo = MemoryRepo::new();
        for (name, email) in [("a", "x@y.z"), ("b", "other@y.z"), ("c", "x@y.z")] {
            repo.insert_document("reservation", doc! { "name": name, "email": email })
                .await
                .unwrap();
        }

        let found = repo
            .find_documents("reservation", doc! { "email": "x@y.z" }, 10)
            .await
            .unwrap();
        let names: Vec<&str> = found.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, ["a", "c"]);

        let capped = repo.find_documents("reservation", doc! {}, 2).await.unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(repo.count("reservation").await, 3);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty() {
        let repo = MemoryRepo::new();
        assert!(repo.find_documents("missing", doc! {}, 5).await.unwrap().is_empty());
        assert!(repo.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn assigns_distinct_object_ids() {
        let repo = MemoryRepo::new();
        let first = repo.insert_document("reservation", doc! {}).await.unwrap();
        let second = repo.insert_document("reservation", doc! {}).await.unwrap();
        assert!(matches!(first, Bson::ObjectId(_)));
        assert_ne!(first, second);
    }
}
