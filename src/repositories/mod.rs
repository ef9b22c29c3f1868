//! Document store adapter.
//!
//! [`Database`] is constructed once at start-up and cloned into every handler.
//! It either wraps a ready [`DocumentStore`] backend or sits in a degraded
//! state, in which every operation fails fast with [`StoreError::Unavailable`].

use std::sync::Arc;
use async_trait::async_trait;
use bson::{Bson, DateTime, Document};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::helpers::json::display_id;

pub mod memory_repo;
pub mod mongo_repo;

/// Listing never returns more than this many documents, whatever the caller asks for.
pub const MAX_FIND_LIMIT: u32 = 500;

/// A backend able to persist and query BSON documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Writes one document and returns the identifier the backend assigned to it.
    async fn insert_document(&self, collection: &str, document: Document) -> StoreResult<Bson>;

    /// Returns at most `limit` documents equal-matching every key of `filter`,
    /// in insertion order.
    async fn find_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: u32,
    ) -> StoreResult<Vec<Document>>;

    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    fn database_name(&self) -> &str;
}

/// Connectivity snapshot reported by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseStatus {
    Connected {
        database: String,
        collections: Vec<String>,
    },
    /// The client exists but the metadata query failed.
    Degraded { database: String, reason: String },
    /// The adapter never initialized.
    Unreachable { reason: String },
}

#[derive(Clone)]
pub struct Database {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn DocumentStore>),
    Degraded(Arc<str>),
}

impl Database {
    /// Builds the adapter from configuration. Never fails: a missing setting or
    /// a client that cannot be built leaves the adapter degraded.
    pub async fn connect(config: &Config) -> Self {
        let (url, name) = match (config.database_url.as_deref(), config.database_name.as_deref()) {
            (Some(url), Some(name)) if config.has_database_url() && config.has_database_name() => {
                (url, name)
            }
            _ => {
                warn!("DATABASE_URL and DATABASE_NAME must both be set, running without a database");
                return Self::degraded("database is not configured");
            }
        };

        match mongo_repo::MongoRepo::connect(url, name, config.database_timeout()).await {
            Ok(repo) => {
                info!("Document store configured for database: {}", name);
                Self::with_backend(Arc::new(repo))
            }
            Err(e) => {
                warn!("Failed to initialize document store due to: {}", e);
                Self::degraded(e.to_string())
            }
        }
    }

    pub fn with_backend(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend: Backend::Ready(backend),
        }
    }

    pub fn degraded(reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self {
            backend: Backend::Degraded(Arc::from(reason)),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    fn ready(&self) -> StoreResult<&Arc<dyn DocumentStore>> {
        match &self.backend {
            Backend::Ready(store) => Ok(store),
            Backend::Degraded(reason) => Err(StoreError::Unavailable(reason.to_string())),
        }
    }

    /// Stamps `created_at`/`updated_at`, writes the document and returns its
    /// identifier as an opaque string. Any client-supplied `_id` is dropped.
    pub async fn insert(&self, collection: &str, mut document: Document) -> StoreResult<String> {
        let store = self.ready()?;

        let now = DateTime::now();
        document.remove("_id");
        document.insert("created_at", now);
        document.insert("updated_at", now);

        let id = store.insert_document(collection, document).await?;

        Ok(display_id(&id))
    }

    pub async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: u32,
    ) -> StoreResult<Vec<Document>> {
        let store = self.ready()?;
        let limit = limit.min(MAX_FIND_LIMIT);
        if limit == 0 {
            return Ok(Vec::new());
        }

        store.find_documents(collection, filter, limit).await
    }

    pub async fn probe(&self) -> DatabaseStatus {
        let store = match &self.backend {
            Backend::Ready(store) => store,
            Backend::Degraded(reason) => {
                return DatabaseStatus::Unreachable {
                    reason: reason.to_string(),
                }
            }
        };

        let database = store.database_name().to_string();
        match store.list_collections().await {
            Ok(collections) => DatabaseStatus::Connected {
                database,
                collections,
            },
            Err(e) => DatabaseStatus::Degraded {
                database,
                reason: e.to_string(),
            },
        }
    }
}
