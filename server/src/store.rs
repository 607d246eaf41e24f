//! In-memory item store.
//!
//! # Design
//! Items live in a `Vec` behind an async `RwLock`, so listing returns them in
//! insertion order. Ids come from an `AtomicU64` that only ever moves forward;
//! an id is allocated while the write lock is held, which keeps insertion
//! order and id order in agreement under concurrent `create` calls.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub completed: bool,
}

#[derive(Debug)]
pub struct ItemStore {
    items: RwLock<Vec<Item>>,
    last_id: AtomicU64,
}

impl ItemStore {
    /// An empty store. The first created item gets id 1.
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// The store the server boots with: three sample items, ids 1 through 3.
    pub fn seeded() -> Self {
        Self::with_items(vec![
            Item {
                id: 1,
                name: "Task 1".to_string(),
                completed: false,
            },
            Item {
                id: 2,
                name: "Task 2".to_string(),
                completed: true,
            },
            Item {
                id: 3,
                name: "Task 3".to_string(),
                completed: false,
            },
        ])
    }

    fn with_items(items: Vec<Item>) -> Self {
        let last_id = items.iter().map(|item| item.id).max().unwrap_or(0);
        Self {
            items: RwLock::new(items),
            last_id: AtomicU64::new(last_id),
        }
    }

    /// Snapshot of every item in insertion order.
    pub async fn list_all(&self) -> Vec<Item> {
        self.items.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Appends a new, not-yet-completed item. `name` must already be validated.
    pub async fn create(&self, name: String) -> Item {
        let mut items = self.items.write().await;
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = Item {
            id,
            name,
            completed: false,
        };
        items.push(item.clone());
        item
    }

    /// Removes the item with `id`, returning it. `None` leaves the store untouched.
    pub async fn delete(&self, id: u64) -> Option<Item> {
        let mut items = self.items.write().await;
        let index = items.iter().position(|item| item.id == id)?;
        Some(items.remove(index))
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn ids(items: &[Item]) -> Vec<u64> {
        items.iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn seeded_store_has_three_items() {
        let store = ItemStore::seeded();
        let items = store.list_all().await;
        assert_eq!(ids(&items), vec![1, 2, 3]);
        assert_eq!(items[0].name, "Task 1");
        assert_eq!(
            items.iter().map(|item| item.completed).collect::<Vec<_>>(),
            vec![false, true, false]
        );
    }

    #[tokio::test]
    async fn create_on_seeded_store_starts_at_four() {
        let store = ItemStore::seeded();
        let item = store.create("Task 4".to_string()).await;
        assert_eq!(
            item,
            Item {
                id: 4,
                name: "Task 4".to_string(),
                completed: false
            }
        );
        assert_eq!(ids(&store.list_all().await), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn create_on_empty_store_starts_at_one() {
        let store = ItemStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.create("first".to_string()).await.id, 1);
    }

    #[tokio::test]
    async fn ids_are_never_reused_after_delete() {
        let store = ItemStore::new();
        let mut issued = Vec::new();
        for round in 0..10 {
            let item = store.create(format!("item {round}")).await;
            issued.push(item.id);
            if round % 2 == 0 {
                store.delete(item.id).await.unwrap();
            }
        }
        assert!(issued.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(store.create("last".to_string()).await.id, 11);
    }

    #[tokio::test]
    async fn delete_missing_id_leaves_store_unchanged() {
        let store = ItemStore::seeded();
        let before = store.list_all().await;
        assert!(store.delete(99).await.is_none());
        assert_eq!(store.list_all().await, before);
    }

    #[tokio::test]
    async fn delete_preserves_order_of_remaining_items() {
        let store = ItemStore::seeded();
        store.create("Task 4".to_string()).await;
        let removed = store.delete(2).await.unwrap();
        assert_eq!(removed.id, 2);
        assert_eq!(ids(&store.list_all().await), vec![1, 3, 4]);
    }

    #[tokio::test]
    async fn create_then_delete_restores_count() {
        let store = ItemStore::seeded();
        let before = store.len().await;
        let item = store.create("X".to_string()).await;
        store.delete(item.id).await.unwrap();
        assert_eq!(store.len().await, before);
    }

    #[tokio::test]
    async fn snapshot_is_independent_of_later_writes() {
        let store = ItemStore::seeded();
        let snapshot = store.list_all().await;
        store.create("later".to_string()).await;
        assert_eq!(snapshot.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_unique_ordered_ids() {
        let store = Arc::new(ItemStore::seeded());
        let handles: Vec<_> = (0..64)
            .map(|n| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.create(format!("concurrent {n}")).await.id })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            assert!(seen.insert(handle.await.unwrap()));
        }
        assert_eq!(seen.len(), 64);

        let listed = ids(&store.list_all().await);
        assert_eq!(listed.len(), 67);
        assert!(listed.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
