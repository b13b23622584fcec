use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tubely_storage::{Storage, StorageBackend, StorageError, StorageResult};

/// Object stored by [`MockStorage`].
#[derive(Clone, Debug)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`Storage`] with switchable failure modes.
pub struct MockStorage {
    bucket: String,
    objects: Mutex<HashMap<(String, String), StoredObject>>,
    puts: AtomicUsize,
    fail_puts: AtomicBool,
    hang_puts: AtomicBool,
}

impl MockStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(HashMap::new()),
            puts: AtomicUsize::new(0),
            fail_puts: AtomicBool::new(false),
            hang_puts: AtomicBool::new(false),
        }
    }

    /// Every put fails as if the bucket were missing.
    pub fn failing(bucket: &str) -> Self {
        let storage = Self::new(bucket);
        storage.fail_puts.store(true, Ordering::SeqCst);
        storage
    }

    /// Every put waits forever.
    pub fn hanging(bucket: &str) -> Self {
        let storage = Self::new(bucket);
        storage.hang_puts.store(true, Ordering::SeqCst);
        storage
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap()
            .keys()
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MockStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        if self.hang_puts.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::BucketNotFound(bucket.to_string()));
        }
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "https://mock.storage/{}/{}?expires_in={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
