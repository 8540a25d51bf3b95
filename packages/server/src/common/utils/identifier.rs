use sha2::{Digest, Sha256};

/// Full SHA256 hex digest of a secret (refresh tokens are stored this way)
pub fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Short, stable digest of a contact address for log lines.
///
/// Emails and phone numbers never appear in logs in plaintext; the first
/// 12 hex chars are enough to correlate requests for one identifier.
pub fn identifier_digest(identifier: &str) -> String {
    let normalized = identifier.trim().to_lowercase();
    let mut digest = sha256_hex(&normalized);
    digest.truncate(12);
    digest
}
