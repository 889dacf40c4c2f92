//! Signing key configuration for confirmation codes and access tokens.
//!
//! The key is read from the file named by `YAMDB_TOKEN_KEY_FILE`. Debug builds,
//! or release builds with `YAMDB_TOKEN_ALLOW_EPHEMERAL` set, fall back to a
//! random per-process key when the file cannot be read; tokens and pending
//! codes then stop validating after a restart.

use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use mockable::Env;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

const TOKEN_KEY_DEFAULT_PATH: &str = "/var/run/secrets/yamdb_token_key";
/// Shortest accepted signing key.
pub const TOKEN_KEY_MIN_LEN: usize = 32;
const KEY_FILE_ENV: &str = "YAMDB_TOKEN_KEY_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "YAMDB_TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for key validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing key files are tolerated with a warning.
    Debug,
    /// A key file is required unless ephemeral keys are explicitly allowed.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Loaded signing key.
pub struct TokenKeyConfig {
    /// Secret bytes, wiped on drop.
    pub key: Zeroizing<Vec<u8>>,
    /// Hex fingerprint safe to log.
    pub fingerprint: String,
    /// Whether the key was generated for this process only.
    pub ephemeral: bool,
}

/// Errors raised while loading the signing key.
#[derive(thiserror::Error, Debug)]
pub enum TokenKeyConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("token key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Truncated SHA-256 fingerprint of `key`, hex encoded.
///
/// # Examples
///
/// ```rust
/// use yamdb::inbound::http::token_config::key_fingerprint;
///
/// let fp = key_fingerprint(&[7_u8; 32]);
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &[u8]) -> String {
    let digest = Sha256::digest(key);
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

/// Load the signing key as directed by the environment.
///
/// # Errors
///
/// Returns [`TokenKeyConfigError`] when a toggle is malformed in release
/// builds, the key file is unreadable and no fallback is allowed, or the key
/// is shorter than [`TOKEN_KEY_MIN_LEN`].
pub fn token_key_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenKeyConfig, TokenKeyConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| TOKEN_KEY_DEFAULT_PATH.to_owned()),
    );

    let config = match read_key(&path) {
        Ok(bytes) => {
            let length = bytes.len();
            if length < TOKEN_KEY_MIN_LEN {
                return Err(TokenKeyConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: TOKEN_KEY_MIN_LEN,
                });
            }
            TokenKeyConfig {
                fingerprint: key_fingerprint(&bytes),
                key: bytes,
                ephemeral: false,
            }
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary token key; issued tokens will not survive a restart"
            );
            let key = ephemeral_key();
            TokenKeyConfig {
                fingerprint: key_fingerprint(&key),
                key,
                ephemeral: true,
            }
        }
        Err(error) => {
            return Err(TokenKeyConfigError::KeyRead {
                path,
                source: error,
            });
        }
    };
    info!(fingerprint = %config.fingerprint, ephemeral = config.ephemeral, "token signing key loaded");
    Ok(config)
}

fn read_key(path: &Path) -> std::io::Result<Zeroizing<Vec<u8>>> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "key path has no file name")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(file_name).map(Zeroizing::new)
}

fn ephemeral_key() -> Zeroizing<Vec<u8>> {
    let mut key = Zeroizing::new(vec![0_u8; TOKEN_KEY_MIN_LEN]);
    rand::thread_rng().fill_bytes(key.as_mut_slice());
    key
}

fn allow_ephemeral_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<bool, TokenKeyConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid YAMDB_TOKEN_ALLOW_EPHEMERAL; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenKeyConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
