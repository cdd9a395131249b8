//! bcrypt-backed [`PasswordHasher`].
//!
//! bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool with the caller's trace id re-entered on the worker thread.

use async_trait::async_trait;
use tokio::task;
use tracing::{debug, error};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, TraceId};

/// Work factor used when none is configured.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Salted bcrypt digests.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl BcryptPasswordHasher {
    /// Create a hasher with an explicit work factor. Values outside bcrypt's
    /// supported range fail at hash time.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

async fn run_blocking<F, R>(work: F) -> Result<R, task::JoinError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let trace_id = TraceId::current();
    task::spawn_blocking(move || match trace_id {
        Some(id) => TraceId::sync_scope(id, work),
        None => work(),
    })
    .await
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let cost = self.cost;
        let plaintext = zeroize::Zeroizing::new(plaintext.to_owned());
        let digest = run_blocking(move || bcrypt::hash(plaintext.as_str(), cost))
            .await
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(digest))
    }

    async fn verify(&self, plaintext: &str, digest: &PasswordHash) -> bool {
        let plaintext = zeroize::Zeroizing::new(plaintext.to_owned());
        let digest = digest.as_str().to_owned();
        match run_blocking(move || bcrypt::verify(plaintext.as_str(), &digest)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(err)) => {
                debug!(error = %err, "stored digest could not be verified");
                false
            }
            Err(err) => {
                error!(error = %err, "password verification task failed");
                false
            }
        }
    }
}
