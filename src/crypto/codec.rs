//! Envelope codec for the secure configuration file consumed by the Windows
//! collector. The format is AES-256-CBC over compact JSON with a SHA-256
//! checksum of the plaintext bytes; every encoding detail here (key
//! derivation, padding, base64/hex forms, field names) is a compatibility
//! requirement, not a local choice.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroize;

use crate::crypto::integrity::{sha256_digest, sha256_hex};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Master key hard-coded in the collector. Changing it, or the single
/// SHA-256 derivation below, breaks every deployed collector install.
const MASTER_KEY: &[u8] = b"BrowserReporter2024!MasterKey";

const ENVELOPE_VERSION: &str = "1.0";
const IV_SIZE: usize = 16;

/// A plaintext configuration document: string keys mapped to arbitrary JSON
/// values. Iteration order is preserved so the canonical serialization (and
/// therefore the checksum) is deterministic for a given caller.
pub type PlainConfig = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("cipher unavailable: {0}")]
    CipherUnavailable(String),
    #[error("config not serializable: {0}")]
    Serialization(String),
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("invalid ciphertext padding")]
    Padding,
    #[error("checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// The persisted envelope, exactly as written to `secureconfig.json`.
/// Immutable once produced; decryption never modifies it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Envelope {
    pub version: String,
    pub encrypted_data: String,
    pub iv: String,
    pub checksum: String,
    pub created_at: u64,
}

/// AES-256 key derived once per process from the embedded master key.
/// Read-only after initialization, so concurrent codec calls never contend.
fn derived_key() -> &'static [u8; 32] {
    static KEY: OnceLock<[u8; 32]> = OnceLock::new();
    KEY.get_or_init(|| sha256_digest(MASTER_KEY))
}

/// Stateless encrypt/decrypt pair for secure configuration envelopes.
pub struct SecureConfigCodec;

impl SecureConfigCodec {
    /// Encrypts a configuration document into a collector-compatible
    /// envelope. The checksum is computed over the exact compact-JSON bytes
    /// that get encrypted, so any later corruption is detectable even when
    /// decryption itself appears to succeed.
    pub fn encrypt(config: &PlainConfig) -> Result<Envelope, CodecError> {
        // Compact JSON, insertion order preserved: the checksum depends on
        // these exact bytes matching what the collector reproduces.
        let mut raw =
            serde_json::to_vec(config).map_err(|e| CodecError::Serialization(format!("{e}")))?;

        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut iv);

        let cipher = Aes256CbcEnc::new_from_slices(derived_key(), &iv)
            .map_err(|e| CodecError::CipherUnavailable(format!("{e}")))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(&raw);
        let checksum = sha256_hex(&raw);
        raw.zeroize();

        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Ok(Envelope {
            version: ENVELOPE_VERSION.to_string(),
            encrypted_data: STANDARD.encode(ciphertext),
            iv: STANDARD.encode(iv),
            checksum,
            created_at,
        })
    }

    /// Decrypts an envelope back into the configuration document, verifying
    /// the plaintext checksum before any parsed data is returned. Fails
    /// whole: no partially recovered output exists on any error path.
    pub fn decrypt(envelope: &Envelope) -> Result<PlainConfig, CodecError> {
        let ciphertext = STANDARD
            .decode(envelope.encrypted_data.as_bytes())
            .map_err(|e| CodecError::MalformedEnvelope(format!("encrypted_data: {e}")))?;
        let iv = STANDARD
            .decode(envelope.iv.as_bytes())
            .map_err(|e| CodecError::MalformedEnvelope(format!("iv: {e}")))?;
        if iv.len() != IV_SIZE {
            return Err(CodecError::MalformedEnvelope(format!(
                "iv is {} bytes, expected {IV_SIZE}",
                iv.len()
            )));
        }

        let cipher = Aes256CbcDec::new_from_slices(derived_key(), &iv)
            .map_err(|e| CodecError::CipherUnavailable(format!("{e}")))?;
        // UnpadError covers both bad trailing-byte patterns and ciphertext
        // lengths that are not a block multiple.
        let mut raw = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| CodecError::Padding)?;

        let actual = sha256_hex(&raw);
        if actual != envelope.checksum {
            raw.zeroize();
            return Err(CodecError::ChecksumMismatch {
                expected: envelope.checksum.clone(),
                actual,
            });
        }

        let text = std::str::from_utf8(&raw)
            .map_err(|e| CodecError::MalformedEnvelope(format!("plaintext not utf-8: {e}")))?;
        let config: PlainConfig = serde_json::from_str(text)
            .map_err(|e| CodecError::MalformedEnvelope(format!("plaintext not a json object: {e}")))?;
        raw.zeroize();
        Ok(config)
    }
}
