use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Client, Collection, IndexModel};
use uuid::Uuid;

use crate::error::Result;
use crate::models::ChatMessage;
use crate::mongo::models::MessageDocument;

#[derive(Clone)]
pub struct MessageRepository {
    collection: Collection<MessageDocument>,
}

impl MessageRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("chat_messages");
        Self { collection }
    }

    /// Secondary indexes backing per-user retrieval and timestamp ordering
    pub async fn ensure_indexes(&self) -> Result<()> {
        self.collection
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
            ])
            .await?;
        Ok(())
    }

    /// Persist a single turn
    pub async fn insert(&self, message: ChatMessage) -> Result<()> {
        let document = MessageDocument::try_from(message)?;
        self.collection.insert_one(&document).await?;
        Ok(())
    }

    /// The most recent `limit` turns for a user, oldest-first
    pub async fn recent(&self, user_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>> {
        let filter = doc! { "user_id": bson::Uuid::from_uuid_1(user_id) };
        let mut documents: Vec<MessageDocument> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        documents.reverse(); // return in chronological order
        Ok(documents.into_iter().map(Into::into).collect())
    }

    /// Delete every turn for a user; returns the number removed
    pub async fn clear(&self, user_id: Uuid) -> Result<u64> {
        let filter = doc! { "user_id": bson::Uuid::from_uuid_1(user_id) };
        let result = self.collection.delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
