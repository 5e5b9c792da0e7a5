use crate::error::ApiError;
use crate::models::PropertyResult;
use crate::search::PropertyQueryParameters;
use async_trait::async_trait;

/// Common trait for listing backends.
/// The session only talks to this, so tests can swap in a fake.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// Run a search and return the listings in backend order
    async fn search(
        &self,
        params: &PropertyQueryParameters,
    ) -> Result<Vec<PropertyResult>, ApiError>;

    /// Fetch one listing by id or slug
    async fn get_property(&self, id_or_slug: &str) -> Result<PropertyResult, ApiError>;

    /// Name of the backend, for logs
    fn source_name(&self) -> &'static str;
}
