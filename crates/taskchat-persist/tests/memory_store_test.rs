use serde_json::json;
use taskchat_persist::{
    MemoryStore, MessageRole, MessageStore, NewTask, PersistError, TaskPatch, TaskStore,
};
use uuid::Uuid;

#[tokio::test]
async fn recent_is_bounded_and_chronological() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    for i in 0..8 {
        store
            .append(user, MessageRole::User, format!("message {i}"), None)
            .await
            .unwrap();
    }

    let recent = store.recent(user, 5).await.unwrap();
    assert_eq!(recent.len(), 5);
    assert!(recent.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    // Bounded from the old end: the newest messages survive
    assert_eq!(recent.last().unwrap().content, "message 7");
    assert_eq!(recent.first().unwrap().content, "message 3");
}

#[tokio::test]
async fn recent_with_large_limit_returns_everything() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    store
        .append(user, MessageRole::User, "only one".to_string(), None)
        .await
        .unwrap();

    let recent = store.recent(user, 50).await.unwrap();
    assert_eq!(recent.len(), 1);
}

#[tokio::test]
async fn saved_message_round_trips() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    let saved = store
        .append(user, MessageRole::User, "X".to_string(), None)
        .await
        .unwrap();

    let history = store.recent(user, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, saved.id);
    assert_eq!(history[0].user_id, user);
    assert_eq!(history[0].role, MessageRole::User);
    assert_eq!(history[0].content, "X");
    assert!(history[0].message_metadata.is_none());
}

#[tokio::test]
async fn metadata_is_present_only_when_attached() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    store
        .append(user, MessageRole::User, "make a task".to_string(), None)
        .await
        .unwrap();
    store
        .append(
            user,
            MessageRole::Assistant,
            "Done".to_string(),
            Some(json!({"function_call": "create_task"})),
        )
        .await
        .unwrap();

    let history = store.recent(user, 10).await.unwrap();
    assert!(history[0].message_metadata.is_none());
    assert_eq!(
        history[1].message_metadata,
        Some(json!({"function_call": "create_task"}))
    );
}

#[tokio::test]
async fn clear_only_touches_the_given_user() {
    let store = MemoryStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    for _ in 0..3 {
        store
            .append(alice, MessageRole::User, "hi".to_string(), None)
            .await
            .unwrap();
    }
    store
        .append(bob, MessageRole::User, "hello".to_string(), None)
        .await
        .unwrap();

    let removed = store.clear(alice).await.unwrap();
    assert_eq!(removed, 3);
    assert!(store.recent(alice, 50).await.unwrap().is_empty());
    assert_eq!(store.recent(bob, 50).await.unwrap().len(), 1);
}

#[tokio::test]
async fn task_create_rejects_empty_title() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    let err = store
        .create(
            user,
            NewTask {
                title: "   ".to_string(),
                description: None,
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, PersistError::Validation(_)));
}

#[tokio::test]
async fn task_list_paginates_newest_first() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();

    for i in 0..5 {
        store
            .create(
                user,
                NewTask {
                    title: format!("task {i}"),
                    description: None,
                },
            )
            .await
            .unwrap();
    }

    let page = store.list(user, 1, 2).await.unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "task 4");

    let second = store.list(user, 2, 2).await.unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].title, "task 2");
}

#[tokio::test]
async fn task_update_and_delete_enforce_ownership() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let task = store
        .create(
            owner,
            NewTask {
                title: "mine".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

    let err = store
        .update(
            stranger,
            task.id,
            TaskPatch {
                is_completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::TaskNotFound(_)));

    let err = store.delete(stranger, task.id).await.unwrap_err();
    assert!(matches!(err, PersistError::TaskNotFound(_)));

    let updated = store
        .update(
            owner,
            task.id,
            TaskPatch {
                is_completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.is_completed);

    store.delete(owner, task.id).await.unwrap();
    assert_eq!(store.list(owner, 1, 10).await.unwrap().total, 0);
}
