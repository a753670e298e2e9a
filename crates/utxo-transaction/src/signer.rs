//! The signer capability seam.
//!
//! The builder never touches curve arithmetic; it hands 32-byte digests
//! to a [`Signer`] and assembles whatever signature bytes come back.
//! [`SoftwareSigner`] is the in-process reference implementation; remote
//! or hardware-backed signers implement the same trait.

use std::fmt;

use k256::ecdsa;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::schnorr;

/// The signature encoding requested from a signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureFormat {
    /// DER-encoded ECDSA. Variable length, at most 72 bytes.
    Ecdsa,
    /// 64-byte fixed-length Schnorr.
    Schnorr,
}

impl SignatureFormat {
    /// The worst-case length of an encoded signature plus its trailing
    /// sighash-type byte.
    ///
    /// Fee estimation uses this bound; an actual DER signature is often a
    /// byte or two shorter, and the resulting slight overpayment is the
    /// intended direction of error.
    pub fn max_signature_len(self) -> usize {
        match self {
            SignatureFormat::Ecdsa => 72 + 1,
            SignatureFormat::Schnorr => 64 + 1,
        }
    }
}

/// A signing key handle: the secret material plus its compressed public
/// key.
///
/// The secret bytes are opaque to the builder; only the signer interprets
/// them. The public key is what the builder embeds in unlocking scripts.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    secret: Vec<u8>,
    public_key: [u8; 33],
}

impl SigningKey {
    /// Create a key handle from secret bytes and the matching compressed
    /// public key.
    pub fn new(secret: Vec<u8>, public_key: [u8; 33]) -> Self {
        SigningKey { secret, public_key }
    }

    /// The compressed public key.
    pub fn public_key(&self) -> &[u8; 33] {
        &self.public_key
    }

    /// The secret key bytes, for signer implementations.
    pub fn secret_bytes(&self) -> &[u8] {
        &self.secret
    }
}

/// Debug shows only the public half.
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({})", hex::encode(self.public_key))
    }
}

/// An opaque failure reported by a [`Signer`] implementation.
///
/// The builder propagates it unmodified inside
/// [`BuildError::SigningFailed`](crate::BuildError::SigningFailed);
/// retry policy belongs to the signer or its caller, never to the
/// builder.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SignerError(String);

impl SignerError {
    /// Wrap a failure description.
    pub fn new(message: impl Into<String>) -> Self {
        SignerError(message.into())
    }
}

/// The signing capability consumed by the transaction builder.
///
/// Implementations must be deterministic per `(digest, key, format)` or
/// at least produce verifiable signatures; the builder calls `sign` once
/// per input and never retries.
pub trait Signer {
    /// Sign a 32-byte digest with the given key in the given format.
    fn sign(
        &self,
        digest: &[u8; 32],
        key: &SigningKey,
        format: SignatureFormat,
    ) -> Result<Vec<u8>, SignerError>;

    /// Verify a signature over a digest against a compressed public key.
    fn verify(
        &self,
        signature: &[u8],
        digest: &[u8; 32],
        public_key: &[u8; 33],
        format: SignatureFormat,
    ) -> bool;
}

/// In-process signer over secp256k1.
///
/// ECDSA uses RFC6979 deterministic nonces and emits low-S DER;
/// Schnorr follows BIP-340 over the x-only half of the public key.
#[derive(Clone, Copy, Debug, Default)]
pub struct SoftwareSigner;

impl Signer for SoftwareSigner {
    fn sign(
        &self,
        digest: &[u8; 32],
        key: &SigningKey,
        format: SignatureFormat,
    ) -> Result<Vec<u8>, SignerError> {
        match format {
            SignatureFormat::Ecdsa => {
                let signing_key = ecdsa::SigningKey::from_slice(key.secret_bytes())
                    .map_err(|e| SignerError::new(format!("invalid secret key: {e}")))?;
                let signature: ecdsa::Signature = signing_key
                    .sign_prehash(digest)
                    .map_err(|e| SignerError::new(format!("ecdsa signing failed: {e}")))?;
                let signature = signature.normalize_s().unwrap_or(signature);
                Ok(signature.to_der().as_bytes().to_vec())
            }
            SignatureFormat::Schnorr => {
                let signing_key = schnorr::SigningKey::from_bytes(key.secret_bytes())
                    .map_err(|e| SignerError::new(format!("invalid secret key: {e}")))?;
                let signature: schnorr::Signature = signing_key
                    .sign_prehash(digest)
                    .map_err(|e| SignerError::new(format!("schnorr signing failed: {e}")))?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }

    fn verify(
        &self,
        signature: &[u8],
        digest: &[u8; 32],
        public_key: &[u8; 33],
        format: SignatureFormat,
    ) -> bool {
        match format {
            SignatureFormat::Ecdsa => {
                let Ok(verifying_key) = ecdsa::VerifyingKey::from_sec1_bytes(public_key) else {
                    return false;
                };
                let Ok(signature) = ecdsa::Signature::from_der(signature) else {
                    return false;
                };
                verifying_key.verify_prehash(digest, &signature).is_ok()
            }
            SignatureFormat::Schnorr => {
                // BIP-340 verifies against the x-only key: the compressed
                // key without its parity byte.
                let Ok(verifying_key) = schnorr::VerifyingKey::from_bytes(&public_key[1..]) else {
                    return false;
                };
                let Ok(signature) = schnorr::Signature::try_from(signature) else {
                    return false;
                };
                verifying_key.verify_prehash(digest, &signature).is_ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use utxo_primitives::hash::sha256d;

    /// A fixed valid secp256k1 secret with its compressed public key.
    fn test_key() -> SigningKey {
        let secret = vec![0x42u8; 32];
        let signing_key = ecdsa::SigningKey::from_slice(&secret).unwrap();
        let public: [u8; 33] = signing_key
            .verifying_key()
            .to_sec1_bytes()
            .as_ref()
            .try_into()
            .unwrap();
        SigningKey::new(secret, public)
    }

    #[test]
    fn ecdsa_sign_verify_roundtrip() {
        let signer = SoftwareSigner;
        let key = test_key();
        let digest = sha256d(b"spend authorization");

        let signature = signer.sign(&digest, &key, SignatureFormat::Ecdsa).unwrap();
        assert!(signature.len() <= SignatureFormat::Ecdsa.max_signature_len() - 1);
        assert!(signer.verify(&signature, &digest, key.public_key(), SignatureFormat::Ecdsa));

        let other = sha256d(b"a different digest");
        assert!(!signer.verify(&signature, &other, key.public_key(), SignatureFormat::Ecdsa));
    }

    #[test]
    fn ecdsa_is_deterministic() {
        let signer = SoftwareSigner;
        let key = test_key();
        let digest = sha256d(b"rfc6979");
        let first = signer.sign(&digest, &key, SignatureFormat::Ecdsa).unwrap();
        let second = signer.sign(&digest, &key, SignatureFormat::Ecdsa).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn schnorr_sign_verify_roundtrip() {
        let signer = SoftwareSigner;
        let secret = vec![0x42u8; 32];
        let schnorr_key = schnorr::SigningKey::from_bytes(&secret).unwrap();
        let mut public = [0u8; 33];
        public[0] = 0x02;
        public[1..].copy_from_slice(&schnorr_key.verifying_key().to_bytes());
        let key = SigningKey::new(secret, public);

        let digest = sha256d(b"taproot-ish");
        let signature = signer.sign(&digest, &key, SignatureFormat::Schnorr).unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signer.verify(&signature, &digest, key.public_key(), SignatureFormat::Schnorr));
    }

    #[test]
    fn invalid_secret_is_a_signer_error() {
        let signer = SoftwareSigner;
        let key = SigningKey::new(vec![0u8; 32], [0x02; 33]);
        let digest = [0u8; 32];
        assert!(signer.sign(&digest, &key, SignatureFormat::Ecdsa).is_err());
    }

    #[test]
    fn debug_redacts_secret_material() {
        let key = test_key();
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&hex::encode(key.secret_bytes())));
        assert!(debug.contains(&hex::encode(key.public_key())));
    }
}
