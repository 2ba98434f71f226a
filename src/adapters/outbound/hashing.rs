use crate::domains::simulation::IdentityHasher;
use sha2::{Digest, Sha256};

/// SHA-256 over `salt || content`, rendered as 64 lowercase hex characters.
#[derive(Debug, Clone, Default)]
pub struct Sha256Hasher {
    salt: String,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_salt(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }
}

impl IdentityHasher for Sha256Hasher {
    fn hash(&self, content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
