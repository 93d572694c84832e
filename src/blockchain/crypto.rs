use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;

/// Errors raised by key handling and signature decoding
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid base58 encoding: {0}")]
    Decode(String),

    #[error("Public key must be 32 bytes")]
    PublicKeyLength,

    #[error("Secret key must be 32 bytes")]
    SecretKeyLength,

    #[error("Signature must be 64 bytes")]
    SignatureLength,

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// A wallet identity: the base58 encoding of an Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn from_public_key(key: &VerifyingKey) -> Self {
        Address(bs58::encode(key.as_bytes()).into_string())
    }

    /// Decodes the address back into a verifying key.
    pub fn to_public_key(&self) -> Result<VerifyingKey, CryptoError> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| CryptoError::Decode(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CryptoError::PublicKeyLength)?;

        VerifyingKey::from_bytes(&bytes).map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A detached Ed25519 signature, base58-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalSignature(pub String);

impl DigitalSignature {
    pub fn from_signature(signature: &Signature) -> Self {
        DigitalSignature(bs58::encode(signature.to_bytes()).into_string())
    }

    pub fn to_signature(&self) -> Result<Signature, CryptoError> {
        let bytes = bs58::decode(&self.0)
            .into_vec()
            .map_err(|e| CryptoError::Decode(e.to_string()))?;
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::SignatureLength)?;

        Ok(Signature::from_bytes(&bytes))
    }
}

/// An Ed25519 keypair together with its derived address.
///
/// The wallet is the signing capability handed to `Transaction::sign`. Key
/// material never leaves it except through `export_secret_key`; the ledger
/// itself only ever sees addresses and signatures.
#[derive(Debug, Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
    address: Address,
}

impl Wallet {
    /// Generates a wallet with a fresh random keypair.
    pub fn new() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Rebuilds a wallet from previously exported secret key bytes.
    pub fn from_secret_key(secret: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; 32] = secret.try_into().map_err(|_| CryptoError::SecretKeyLength)?;
        Ok(Self::from_signing_key(SigningKey::from_bytes(&bytes)))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = VerifyingKey::from(&signing_key);
        let address = Address::from_public_key(&verifying_key);

        Wallet {
            signing_key,
            verifying_key,
            address,
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn public_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Signs a message with the wallet's secret key.
    pub fn sign(&self, message: &[u8]) -> DigitalSignature {
        DigitalSignature::from_signature(&self.signing_key.sign(message))
    }

    /// Exports the secret key so the caller can persist the wallet.
    pub fn export_secret_key(&self) -> Vec<u8> {
        self.signing_key.to_bytes().to_vec()
    }
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks `signature` over `message` against `public_key`.
///
/// A well-formed signature that simply does not match yields `Ok(false)`;
/// `Err` is reserved for input that cannot be decoded at all.
pub fn verify_signature(
    message: &[u8],
    signature: &DigitalSignature,
    public_key: &VerifyingKey,
) -> Result<bool, CryptoError> {
    let signature = signature.to_signature()?;
    Ok(public_key.verify(message, &signature).is_ok())
}
