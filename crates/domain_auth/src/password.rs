//! Password hashing and verification
//!
//! Digests are bcrypt strings: salted per call, with the cost factor encoded
//! in the digest itself so it can be raised without invalidating old hashes.

/// Lowest work factor bcrypt accepts
pub const MIN_COST: u32 = 4;
/// Highest work factor bcrypt accepts
pub const MAX_COST: u32 = 31;

/// Hashes and verifies passwords with a configurable bcrypt cost
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor
    ///
    /// The cost is clamped to the range bcrypt accepts (4..=31).
    pub fn new(cost: u32) -> Self {
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    /// Returns the configured work factor
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Produces a salted digest of the plaintext
    ///
    /// # Errors
    ///
    /// Returns the underlying bcrypt error if the OS random source fails.
    pub fn hash(&self, plaintext: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(plaintext, self.cost)
    }

    /// Checks a plaintext against a stored digest
    ///
    /// A malformed digest is reported as a non-match.
    pub fn matches(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::verify(plaintext, digest).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::new(MIN_COST)
    }

    #[test]
    fn test_hash_then_match() {
        let hasher = fast();
        let digest = hasher.hash("secret1").unwrap();
        assert!(hasher.matches("secret1", &digest));
        assert!(!hasher.matches("secret2", &digest));
    }

    #[test]
    fn test_salted() {
        let hasher = fast();
        let first = hasher.hash("secret1").unwrap();
        let second = hasher.hash("secret1").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_digest_is_non_match() {
        let hasher = fast();
        assert!(!hasher.matches("secret1", "not-a-bcrypt-digest"));
        assert!(!hasher.matches("secret1", ""));
    }

    #[test]
    fn test_cost_is_clamped() {
        assert_eq!(PasswordHasher::new(0).cost(), 4);
        assert_eq!(PasswordHasher::new(99).cost(), 31);
        assert_eq!(PasswordHasher::new(10).cost(), 10);
        assert_eq!(PasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}
