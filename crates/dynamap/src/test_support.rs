use std::sync::LazyLock;

use dynamap_core::{Entity, EntityMetadata, IndexDescriptor};
use serde::{Deserialize, Serialize};

use crate::handle::ClientHandle;
use crate::inmemory::InMemoryExecutor;
use crate::provision::create_table;
use crate::write::put_object;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvent {
    pub user_id: String,
    pub ts: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub x: i64,
    pub y: i64,
}

static USER_EVENT: LazyLock<EntityMetadata> = LazyLock::new(|| {
    EntityMetadata::new("user_events", "userId")
        .with_sort_key("ts")
        .with_index("byStatus", IndexDescriptor::new("status"))
});

impl Entity for UserEvent {
    fn metadata() -> &'static EntityMetadata {
        &USER_EVENT
    }
}

pub fn event(user_id: &str, ts: &str) -> UserEvent {
    UserEvent {
        user_id: user_id.to_string(),
        ts: ts.to_string(),
        status: None,
        x: 1,
        y: 1,
    }
}

/// A handle over an in-memory store with the `user_events` table created.
pub async fn handle() -> ClientHandle {
    let handle = ClientHandle::with_executor(InMemoryExecutor::new());
    create_table::<UserEvent>(&handle).await.unwrap();
    handle
}

/// A handle holding `count` events for `u1`, with timestamps `t1..=tN`.
pub async fn seeded_handle(count: usize) -> ClientHandle {
    let handle = handle().await;
    for n in 1..=count {
        put_object(&handle, &event("u1", &format!("t{n}")))
            .await
            .unwrap();
    }
    handle
}
