use async_trait::async_trait;

use crate::core::error::Result;

/// Upload collaborator contract: store bytes, hand back a public URL.
///
/// Keys are logical object paths (e.g. `hazards/<id>.jpg`); where they land
/// inside a bucket is an implementation detail.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object and return its public URL
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String>;

    /// Delete an object by logical key
    async fn delete(&self, key: &str) -> Result<()>;

    /// Resolve a URL produced by `store` back to its logical key;
    /// `None` for URLs this store does not own
    fn key_for_url(&self, url: &str) -> Option<String>;

    /// Delete by URL; foreign URLs are ignored
    async fn delete_url(&self, url: &str) -> Result<()> {
        match self.key_for_url(url) {
            Some(key) => self.delete(&key).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::core::error::AppError;

    const BASE_URL: &str = "http://media.local/hazardwatch-media/public";

    /// In-memory stand-in for the object store, for handler-level tests.
    /// Tracks stored keys so orphan cleanup can be observed.
    #[derive(Default)]
    pub struct InMemoryStore {
        objects: Mutex<HashMap<String, String>>,
    }

    impl InMemoryStore {
        pub fn object_count(&self) -> usize {
            self.objects.lock().unwrap().len()
        }

        pub fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains_key(key)
        }
    }

    #[async_trait]
    impl ObjectStore for InMemoryStore {
        async fn store(&self, key: &str, _data: Vec<u8>, content_type: &str) -> Result<String> {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), content_type.to_string());
            Ok(format!("{}/{}", BASE_URL, key))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .remove(key)
                .map(|_| ())
                .ok_or_else(|| AppError::Storage(format!("No such object: {}", key)))
        }

        fn key_for_url(&self, url: &str) -> Option<String> {
            url.strip_prefix(&format!("{}/", BASE_URL))
                .map(|key| key.to_string())
        }
    }

    #[tokio::test]
    async fn store_and_delete_round_trip() {
        let store = InMemoryStore::default();
        let url = store
            .store("hazards/a.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();
        assert_eq!(store.object_count(), 1);
        assert_eq!(store.key_for_url(&url).as_deref(), Some("hazards/a.jpg"));

        store.delete_url(&url).await.unwrap();
        assert_eq!(store.object_count(), 0);
    }

    #[tokio::test]
    async fn foreign_urls_are_ignored_on_delete() {
        let store = InMemoryStore::default();
        assert!(store
            .delete_url("http://elsewhere.example/file.png")
            .await
            .is_ok());
    }
}
