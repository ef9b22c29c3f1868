use std::time::Duration;
use async_trait::async_trait;
use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::error::{StoreError, StoreResult};
use crate::repositories::DocumentStore;

const APP_NAME: &str = "divines-api";

/// MongoDB-backed document store. The client keeps its own connection pool and
/// connects lazily, so construction succeeds even when the server is down.
#[derive(Debug, Clone)]
pub struct MongoRepo {
    client: Client,
    database: String,
}

impl MongoRepo {
    pub async fn connect(url: &str, database: &str, timeout: Duration) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client =
            Client::with_options(options).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            database: database.to_string(),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.client.database(&self.database).collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoRepo {
    async fn insert_document(&self, collection: &str, document: Document) -> StoreResult<Bson> {
        let result = self.collection(collection).insert_one(document).await?;

        Ok(result.inserted_id)
    }

    async fn find_documents(
        &self,
        collection: &str,
        filter: Document,
        limit: u32,
    ) -> StoreResult<Vec<Document>> {
        Ok(self
            .collection(collection)
            .find(filter)
            .sort(doc! { "created_at": 1, "_id": 1 })
            .limit(i64::from(limit))
            .await?
            .try_collect::<Vec<Document>>()
            .await?)
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .client
            .database(&self.database)
            .list_collection_names()
            .await?)
    }

    fn database_name(&self) -> &str {
        &self.database
    }
}
