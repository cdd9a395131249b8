//! Port for one-way password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while producing a digest.
    pub enum PasswordHashError {
        /// The hashing backend failed or its task was lost.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted one-way password digests.
///
/// Implementations may be slow by design; both methods are suspending calls
/// so adapters can move the work off request workers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a freshly salted digest. Two calls with the same input yield
    /// different digests.
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Compare `plaintext` against `digest` in constant time. A malformed
    /// digest verifies as `false`.
    async fn verify(&self, plaintext: &str, digest: &PasswordHash) -> bool;
}
