//! Address recovery from the node's encrypted identity key.
//!
//! Bee keeps its identity as an Ethereum v3 keystore under
//! `<data-dir>/keys/swarm.key`. Checking the password only needs the KDF and
//! the MAC; the key itself is never decrypted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sha3::{Digest, Keccak256};
use subtle::ConstantTimeEq;
use thiserror::Error;

use sm_core::{IdentityAddress, SecretString};

#[derive(Debug, Error)]
pub enum KeystoreError {
    #[error("keystore not found: {0}")]
    NotFound(PathBuf),
    #[error("keystore unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("keystore malformed: {0}")]
    Malformed(String),
    #[error("unsupported keystore kdf: {0}")]
    UnsupportedKdf(String),
    #[error("wrong password for keystore")]
    WrongPassword,
}

#[derive(Debug, Deserialize)]
struct KeystoreFile {
    address: String,
    #[serde(alias = "Crypto")]
    crypto: CryptoSection,
}

#[derive(Debug, Deserialize)]
struct CryptoSection {
    ciphertext: String,
    kdf: String,
    kdfparams: serde_json::Value,
    mac: String,
}

#[derive(Debug, Deserialize)]
struct ScryptParams {
    n: u64,
    r: u32,
    p: u32,
    dklen: usize,
    salt: String,
}

pub fn keystore_path(storage_path: &Path) -> PathBuf {
    storage_path.join("keys").join("swarm.key")
}

/// Address of the keystore under `storage_path`, once `password` is proven
/// to unlock it.
pub fn read_keystore_address(
    storage_path: &Path,
    password: &SecretString,
) -> Result<IdentityAddress, KeystoreError> {
    let path = keystore_path(storage_path);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(KeystoreError::NotFound(path))
        }
        Err(e) => return Err(e.into()),
    };
    let keystore: KeystoreFile =
        serde_json::from_str(&raw).map_err(|e| KeystoreError::Malformed(e.to_string()))?;

    verify_password(&keystore.crypto, password)?;
    Ok(IdentityAddress::new(&keystore.address))
}

fn verify_password(crypto: &CryptoSection, password: &SecretString) -> Result<(), KeystoreError> {
    if crypto.kdf != "scrypt" {
        return Err(KeystoreError::UnsupportedKdf(crypto.kdf.clone()));
    }
    let params: ScryptParams = serde_json::from_value(crypto.kdfparams.clone())
        .map_err(|e| KeystoreError::Malformed(format!("kdfparams: {e}")))?;
    if params.dklen < 32 {
        return Err(KeystoreError::Malformed(format!(
            "derived key too short: {}",
            params.dklen
        )));
    }
    if !params.n.is_power_of_two() || params.n < 2 {
        return Err(KeystoreError::Malformed(format!(
            "scrypt n is not a power of two: {}",
            params.n
        )));
    }
    let log_n = params.n.trailing_zeros() as u8;

    let salt = decode_hex("salt", &params.salt)?;
    let ciphertext = decode_hex("ciphertext", &crypto.ciphertext)?;
    let expected_mac = decode_hex("mac", &crypto.mac)?;

    let scrypt_params = scrypt::Params::new(log_n, params.r, params.p, params.dklen)
        .map_err(|e| KeystoreError::Malformed(format!("scrypt params: {e}")))?;
    let mut derived = vec![0u8; params.dklen];
    scrypt::scrypt(
        password.expose().as_bytes(),
        &salt,
        &scrypt_params,
        &mut derived,
    )
    .map_err(|e| KeystoreError::Malformed(format!("scrypt: {e}")))?;

    let mut hasher = Keccak256::new();
    hasher.update(&derived[16..32]);
    hasher.update(&ciphertext);
    let mac = hasher.finalize();

    if bool::from(mac.as_slice().ct_eq(&expected_mac)) {
        Ok(())
    } else {
        Err(KeystoreError::WrongPassword)
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, KeystoreError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).map_err(|e| KeystoreError::Malformed(format!("{field}: {e}")))
}
