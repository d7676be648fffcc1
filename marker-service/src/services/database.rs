use crate::models::Marker;
use crate::services::store::{MarkerStore, StoreError};
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::ClientOptions,
    Client as MongoClient, Collection, Database,
};
use service_core::error::AppError;
use std::time::Duration;

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    /// Builds the process-wide client. `server_selection_timeout` bounds how
    /// long any single operation waits for a reachable server.
    pub async fn connect(
        uri: &str,
        database: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;
        options.app_name = Some("marker-service".to_string());
        options.server_selection_timeout = Some(server_selection_timeout);

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);

        tracing::info!(database = %database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn health_check(&self) -> Result<(), MongoError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub fn markers(&self, collection: &str) -> Collection<Marker> {
        self.db.collection(collection)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// `MarkerStore` over a MongoDB collection; marker ids are the `_id` key.
#[derive(Clone)]
pub struct MongoMarkerStore {
    db: MongoDb,
    markers: Collection<Marker>,
}

impl MongoMarkerStore {
    pub fn new(db: MongoDb, collection: &str) -> Self {
        let markers = db.markers(collection);
        Self { db, markers }
    }

    pub fn db(&self) -> &MongoDb {
        &self.db
    }
}

#[async_trait]
impl MarkerStore for MongoMarkerStore {
    async fn list(&self) -> Result<Vec<Marker>, StoreError> {
        let cursor = self
            .markers
            .find(doc! {}, None)
            .await
            .context("failed to query markers")?;

        let markers: Vec<Marker> = cursor
            .try_collect()
            .await
            .context("failed to read markers cursor")?;

        Ok(markers)
    }

    async fn insert(&self, marker: &Marker) -> Result<(), StoreError> {
        match self.markers.insert_one(marker, None).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey(marker.id.clone())),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to insert marker {}", marker.id))
                .into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = self
            .markers
            .delete_one(doc! { "_id": id }, None)
            .await
            .with_context(|| format!("failed to delete marker {}", id))?;

        Ok(result.deleted_count > 0)
    }

    async fn replace(&self, marker: &Marker) -> Result<bool, StoreError> {
        let result = self
            .markers
            .replace_one(doc! { "_id": marker.id.as_str() }, marker, None)
            .await
            .with_context(|| format!("failed to replace marker {}", marker.id))?;

        Ok(result.matched_count > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.db
            .health_check()
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}
