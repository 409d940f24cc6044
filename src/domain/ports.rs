use crate::domain::model::{Car, Format};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn list_files(
        &self,
        extension: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    /// Filesystem location of `path`, for backends that need a real file.
    fn locate(&self, path: &str) -> PathBuf;
}

#[async_trait]
pub trait Codec: Send + Sync {
    fn format(&self) -> Format;
    /// Replaces whatever `path` held with `records`.
    async fn export(&self, records: &[Car], path: &str) -> Result<()>;
    /// Adds `records` after the rows already in `path`, creating it if needed.
    async fn append(&self, records: &[Car], path: &str) -> Result<()>;
    async fn import(&self, path: &str) -> Result<Vec<Car>>;
}
