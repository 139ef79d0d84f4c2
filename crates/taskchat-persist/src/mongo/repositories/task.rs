use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, IndexModel};
use uuid::Uuid;

use crate::error::{PersistError, Result};
use crate::models::{Task, TaskPage, TaskPatch};
use crate::mongo::models::TaskDocument;

#[derive(Clone)]
pub struct TaskRepository {
    collection: Collection<TaskDocument>,
}

impl TaskRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("tasks");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        self.collection
            .create_indexes(vec![
                IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
                IndexModel::builder().keys(doc! { "created_at": 1 }).build(),
            ])
            .await?;
        Ok(())
    }

    pub async fn insert(&self, task: Task) -> Result<()> {
        let document = TaskDocument::from(task);
        self.collection.insert_one(&document).await?;
        Ok(())
    }

    /// One page of a user's tasks, newest first; `page` is 1-based
    pub async fn page(&self, user_id: Uuid, page: i64, page_size: i64) -> Result<TaskPage> {
        let filter = doc! { "user_id": bson::Uuid::from_uuid_1(user_id) };
        let total = self.collection.count_documents(filter.clone()).await?;

        let skip = (page - 1).max(0) * page_size;
        let documents: Vec<TaskDocument> = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .skip(skip as u64)
            .limit(page_size)
            .await?
            .try_collect()
            .await?;

        Ok(TaskPage {
            items: documents.into_iter().map(Into::into).collect(),
            total,
            page,
            page_size,
        })
    }

    pub async fn update(&self, user_id: Uuid, task_id: Uuid, patch: TaskPatch) -> Result<Task> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(title) = patch.title {
            set.insert("title", title);
        }
        if let Some(description) = patch.description {
            set.insert("description", description);
        }
        if let Some(is_completed) = patch.is_completed {
            set.insert("is_completed", is_completed);
        }

        let filter = doc! {
            "_id": bson::Uuid::from_uuid_1(task_id),
            "user_id": bson::Uuid::from_uuid_1(user_id),
        };
        let updated = self
            .collection
            .find_one_and_update(filter, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;

        updated
            .map(Into::into)
            .ok_or(PersistError::TaskNotFound(task_id))
    }

    pub async fn delete(&self, user_id: Uuid, task_id: Uuid) -> Result<()> {
        let filter = doc! {
            "_id": bson::Uuid::from_uuid_1(task_id),
            "user_id": bson::Uuid::from_uuid_1(user_id),
        };
        let result = self.collection.delete_one(filter).await?;

        if result.deleted_count == 0 {
            return Err(PersistError::TaskNotFound(task_id));
        }
        Ok(())
    }
}
