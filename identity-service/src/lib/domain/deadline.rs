use std::future::Future;
use std::time::Duration;

use crate::account::errors::RepositoryError;

/// Default upper bound on a single store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Run a store operation under a deadline.
///
/// An elapsed deadline drops the operation (for a transaction, that rolls it
/// back) and reports `RepositoryError::Timeout`.
pub async fn within<T, F>(limit: Duration, operation: F) -> Result<T, RepositoryError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| RepositoryError::Timeout)?
}
