//! Provisioning layer around the envelope codec. Reads a plaintext JSON
//! configuration, encrypts it, and writes the `secureconfig.json` artifact
//! the collector picks up; the reverse path loads and verifies an existing
//! envelope file. Plaintext configuration never touches disk on the way out.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::crypto::codec::{CodecError, Envelope, PlainConfig, SecureConfigCodec};

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// Reads a plaintext JSON configuration file, encrypts it, and writes the
/// envelope to `out_path`. Returns the envelope so callers can inspect the
/// checksum or creation time without re-reading the file.
pub fn provision_secure_config(
    plain_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
) -> Result<Envelope, ProvisionError> {
    let raw_json = fs::read_to_string(&plain_path).map_err(|e| ProvisionError::Io(format!("{e}")))?;
    let config: PlainConfig =
        serde_json::from_str(&raw_json).map_err(|e| ProvisionError::Parse(format!("{e}")))?;

    let envelope = SecureConfigCodec::encrypt(&config)?;
    let payload =
        serde_json::to_vec_pretty(&envelope).map_err(|e| ProvisionError::Parse(format!("{e}")))?;
    fs::write(&out_path, payload).map_err(|e| ProvisionError::Io(format!("{e}")))?;
    Ok(envelope)
}

/// Loads an envelope file and decrypts it back into the configuration
/// document, with full integrity verification before anything is returned.
pub fn load_secure_config(path: impl AsRef<Path>) -> Result<PlainConfig, ProvisionError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ProvisionError::Io(format!("{e}")))?;
    let envelope: Envelope =
        serde_json::from_str(&raw_json).map_err(|e| ProvisionError::Parse(format!("{e}")))?;
    Ok(SecureConfigCodec::decrypt(&envelope)?)
}

#[cfg(test)]
mod tests {
    use super::{load_secure_config, provision_secure_config, ProvisionError};
    use crate::crypto::codec::CodecError;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn provisions_and_loads_secure_config() {
        let dir = tempdir().expect("temp dir");
        let plain_path = dir.path().join("config.json");
        let out_path = dir.path().join("secureconfig.json");

        let plain = json!({"apiKey": "abc123", "interval": 30, "uploadUrl": "https://reports.example"});
        fs::write(&plain_path, serde_json::to_vec(&plain).unwrap()).unwrap();

        let envelope = provision_secure_config(&plain_path, &out_path).expect("provisioning works");
        assert_eq!(envelope.version, "1.0");

        let loaded = load_secure_config(&out_path).expect("envelope loads");
        assert_eq!(serde_json::Value::Object(loaded), plain);
    }

    #[test]
    fn rejects_non_object_plaintext() {
        let dir = tempdir().expect("temp dir");
        let plain_path = dir.path().join("config.json");
        fs::write(&plain_path, b"[1, 2, 3]").unwrap();

        let err = provision_secure_config(&plain_path, dir.path().join("out.json"))
            .expect_err("arrays are not configuration documents");
        assert!(matches!(err, ProvisionError::Parse(_)));
    }

    #[test]
    fn surfaces_corruption_on_load() {
        let dir = tempdir().expect("temp dir");
        let plain_path = dir.path().join("config.json");
        let out_path = dir.path().join("secureconfig.json");
        fs::write(&plain_path, b"{\"apiKey\":\"abc123\"}").unwrap();
        provision_secure_config(&plain_path, &out_path).expect("provisioning works");

        let mut envelope: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
        envelope["checksum"] = json!("f".repeat(64));
        fs::write(&out_path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        let err = load_secure_config(&out_path).expect_err("corrupted envelope must fail");
        assert!(matches!(
            err,
            ProvisionError::Codec(CodecError::ChecksumMismatch { .. })
        ));
    }
}
