use std::path::PathBuf;

/// Destination for uploaded images: a single bucket of flat object names.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    fn bucket(&self) -> &str;
    /// Creates the bucket if it does not exist yet.
    async fn ensure(&self) -> std::io::Result<()>;
    async fn put(&self, name: &str, bytes: &[u8], content_type: &str) -> std::io::Result<()>;
}

/// Bucket kept as a directory under a local root.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    bucket: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }
    fn dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }
    async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.dir()).await
    }
    async fn put(&self, name: &str, bytes: &[u8], content_type: &str) -> std::io::Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid object name {}", name),
            ));
        }
        log::debug!("storing {} ({}, {} bytes)", name, content_type, bytes.len());
        tokio::fs::write(self.dir().join(name), bytes).await
    }
}
