use async_trait::async_trait;

use crate::repos::error::RepoResult;
use crate::services::auth::principal::UserRecord;

/// Lookup port the resolver reads user records through.
///
/// Contract:
/// - `Ok(Some(_))`: exactly one matching record
/// - `Ok(None)`: no match (absence is not an error)
/// - `Err(_)`: backend failure (connectivity, decoding, ...)
///
/// Implementations must be safe for concurrent reads.
#[async_trait]
pub trait UserRecordProvider: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn find_by_identifier(&self, identifier: &str) -> RepoResult<Option<UserRecord>>;
}
