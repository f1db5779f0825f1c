//! SHA-256 helpers shared by the envelope codec and the CLI. Kept separate
//! from the codec so digest handling cannot drift between key derivation and
//! checksum verification.

use sha2::{Digest, Sha256};

/// Produces a raw SHA-256 digest of the provided bytes.
pub fn sha256_digest(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Returns the lowercase hexadecimal representation of a SHA-256 digest.
/// This is the exact checksum format the collector compares against.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = sha256_digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::{sha256_digest, sha256_hex};

    #[test]
    fn hashes_to_hex() {
        assert_eq!(
            sha256_hex(b"{}"),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn digest_matches_hex_form() {
        let digest = sha256_digest(b"reporter");
        assert_eq!(hex::encode(digest), sha256_hex(b"reporter"));
    }
}
