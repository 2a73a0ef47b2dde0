use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::modules::file_upload::storage::{
    get_alternative_name, get_valid_name, join_url, Storage, StorageResult,
};

/// Process-local storage. Contents vanish with the process.
#[derive(Default)]
pub struct InMemoryStorage {
    files: RwLock<HashMap<String, Vec<u8>>>,
    base_url: String,
}

impl InMemoryStorage {
    pub fn new(base_url: String) -> Self {
        Self { files: RwLock::new(HashMap::new()), base_url }
    }

    #[allow(dead_code)]
    pub async fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.read().await.get(name).cloned()
    }

    #[allow(dead_code)]
    pub async fn file_count(&self) -> usize {
        self.files.read().await.len()
    }
}

#[async_trait::async_trait]
impl Storage for InMemoryStorage {
    async fn save(&self, name: &str, content: &[u8]) -> StorageResult<String> {
        let mut name = get_valid_name(name)?;
        let mut files = self.files.write().await;
        while files.contains_key(&name) {
            name = get_alternative_name(&name);
        }
        files.insert(name.clone(), content.to_vec());
        tracing::debug!(name = %name, size_bytes = content.len(), "In-memory storage save");
        Ok(name)
    }

    fn url(&self, name: &str) -> String {
        join_url(&self.base_url, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_save_and_get() {
        let storage = InMemoryStorage::new("https://cdn.test/media".to_string());
        let name = storage.save("a/b.png", b"data").await.unwrap();
        assert_eq!(name, "a/b.png");
        assert_eq!(storage.get("a/b.png").await.unwrap(), b"data");
        assert_eq!(storage.url(&name), "https://cdn.test/media/a/b.png");
    }

    #[actix_web::test]
    async fn test_same_name_twice_keeps_both() {
        let storage = InMemoryStorage::new("/media/".to_string());
        let first = storage.save("b.png", b"1").await.unwrap();
        let second = storage.save("b.png", b"2").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(storage.file_count().await, 2);
        assert_eq!(storage.get(&first).await.unwrap(), b"1");
    }
}
