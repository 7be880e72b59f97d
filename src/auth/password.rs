//! Password hashing and verification.
//!
//! Uses bcrypt with a fixed cost of 12. The produced hash string embeds the
//! algorithm, cost, and salt, so verification needs nothing but the stored
//! string. Hashing is deliberately slow; the login rate limiter exists
//! because verification cost is attacker-triggerable.

use tracing::error;

/// bcrypt work factor. Fixed policy, not runtime-configurable.
pub const HASH_COST: u32 = 12;

#[derive(Debug, thiserror::Error)]
#[error("failed to hash password")]
pub struct HashingError(#[source] bcrypt::BcryptError);

/// Hash a plaintext password into a self-describing bcrypt string.
///
/// # Errors
/// Returns `HashingError` if the underlying primitive fails.
pub fn hash_password(plaintext: &str) -> Result<String, HashingError> {
    bcrypt::hash(plaintext, HASH_COST).map_err(|err| {
        error!("Password hashing failed: {err}");
        HashingError(err)
    })
}

/// Verify a plaintext password against a stored hash.
///
/// Never fails: a malformed hash or internal error verifies as `false`, so
/// callers can treat the result as a plain credential check.
#[must_use]
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    bcrypt::verify(plaintext, hash).unwrap_or(false)
}
