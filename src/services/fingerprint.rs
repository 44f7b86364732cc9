//! Content fingerprinting and change classification
//!
//! A show's fingerprint is the SHA-256 of the raw file bytes. The changed-only
//! sync mode compares it against the hash stored with the show row to decide
//! whether reconciliation can be skipped; full sync ignores the classification
//! and reconciles unconditionally.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hex digest of raw file content.
pub fn content_hash(content: &[u8]) -> String {
    let hash = Sha256::digest(content);
    format!("{:x}", hash)
}

/// How a file relates to the previously stored state for its episode number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    /// No prior record for this episode number
    New,
    /// Stored fingerprint matches; reconciliation can be skipped entirely
    Unchanged,
    /// Stored fingerprint differs; full reconciliation required
    Modified,
}

/// Classify a fresh fingerprint against the stored one, if any.
pub fn classify(stored: Option<&str>, fresh: &str) -> ChangeClass {
    match stored {
        None => ChangeClass::New,
        Some(stored) if stored == fresh => ChangeClass::Unchanged,
        Some(_) => ChangeClass::Modified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = content_hash(b"---\ntitle: x\n---\nbody");
        let b = content_hash(b"---\ntitle: x\n---\nbody");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn single_byte_change_changes_hash() {
        let a = content_hash(b"---\ntitle: x\n---\nbody");
        let b = content_hash(b"---\ntitle: x\n---\nbodY");
        assert_ne!(a, b);
    }

    #[test]
    fn classification() {
        let fresh = content_hash(b"content");
        assert_eq!(classify(None, &fresh), ChangeClass::New);
        assert_eq!(classify(Some(fresh.as_str()), &fresh), ChangeClass::Unchanged);
        assert_eq!(classify(Some("deadbeef"), &fresh), ChangeClass::Modified);
    }
}
