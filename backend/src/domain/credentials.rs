//! Salted digests for admin passwords and one-time login codes.
//!
//! Digests are stored as `sha256$<salt hex>$<digest hex>`. Plaintext secrets
//! only ever live in [`Zeroizing`] buffers.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Returned when a stored digest does not follow the expected format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored secret digest is malformed")]
pub struct MalformedDigest;

/// Salted SHA-256 digest of a secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretDigest {
    salt: Vec<u8>,
    digest: Vec<u8>,
}

impl SecretDigest {
    /// Digest `secret` under a fresh random salt.
    pub fn derive(secret: &str) -> Self {
        let mut salt = vec![0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(secret, salt)
    }

    fn with_salt(secret: &str, salt: Vec<u8>) -> Self {
        let digest = compute(&salt, secret);
        Self { salt, digest }
    }

    /// Compare `candidate` against this digest in constant time.
    pub fn verify(&self, candidate: &str) -> bool {
        let computed = compute(&self.salt, candidate);
        computed.len() == self.digest.len()
            && computed
                .iter()
                .zip(&self.digest)
                .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }

    /// Parse the stored representation.
    pub fn parse(stored: &str) -> Result<Self, MalformedDigest> {
        let mut parts = stored.split('$');
        let (Some(SCHEME), Some(salt), Some(digest), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MalformedDigest);
        };
        let salt = hex::decode(salt).map_err(|_| MalformedDigest)?;
        let digest = hex::decode(digest).map_err(|_| MalformedDigest)?;
        Ok(Self { salt, digest })
    }

    /// Storage representation.
    pub fn encode(&self) -> String {
        format!("{SCHEME}${}${}", hex::encode(&self.salt), hex::encode(&self.digest))
    }
}

fn compute(salt: &[u8], secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

impl fmt::Debug for SecretDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretDigest(<redacted>)")
    }
}

/// Generate a six digit one-time code.
pub fn generate_login_code() -> Zeroizing<String> {
    let code: u32 = rand::Rng::gen_range(&mut rand::thread_rng(), 0..1_000_000);
    Zeroizing::new(format!("{code:06}"))
}
