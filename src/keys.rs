//! X25519 key material and the Diffie-Hellman combine.
//!
//! Public keys are opaque 32-byte values. A combine that lands on the
//! all-zeros output (a low-order or identity input) is rejected with
//! [`Error::DhFailure`]; the handshake holding it must be abandoned.

use rand_core::CryptoRngCore;
use subtle::ConstantTimeEq;
use x25519_dalek::{PublicKey as DalekPublicKey, StaticSecret as DalekStaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::Error;

/// An X25519 secret key, usable as a static or ephemeral key.
///
/// Zeroized from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct StaticSecret(DalekStaticSecret);

impl StaticSecret {
    /// Create from raw 32-byte secret key material.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(DalekStaticSecret::from(bytes))
    }

    /// Export the raw 32-byte secret key material.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }
}

impl core::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("StaticSecret([REDACTED])")
    }
}

/// An X25519 public key (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// The length of a public key on the wire.
    pub const LEN: usize = 32;

    /// Create from raw 32-byte public key material.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a public key from the front of a received message.
    pub(crate) fn read_from(buffer: &[u8]) -> Result<Self, Error> {
        let bytes = buffer.get(..Self::LEN).ok_or(Error::CiphertextTooShort)?;
        let mut key = [0u8; Self::LEN];
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Access the raw bytes of this public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey({:02x?})", &self.0[..4])
    }
}

/// A shared secret produced by [`KeyPair::dh`].
///
/// Zeroized on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; 32]);

impl SharedSecret {
    /// Access the raw 32-byte shared secret.
    pub(crate) fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl core::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}

/// A secret key together with its public key.
#[derive(Clone)]
pub struct KeyPair {
    pub secret: StaticSecret,
    pub public: PublicKey,
}

impl KeyPair {
    /// Generate a new random keypair using the provided RNG.
    pub fn generate(rng: &mut impl CryptoRngCore) -> Self {
        let secret = DalekStaticSecret::random_from_rng(rng);
        let public = DalekPublicKey::from(&secret);
        Self {
            secret: StaticSecret(secret),
            public: PublicKey(public.to_bytes()),
        }
    }

    /// Create a keypair from an existing secret, deriving the public key.
    pub fn from_secret(secret: StaticSecret) -> Self {
        let public = DalekPublicKey::from(&secret.0);
        Self {
            secret,
            public: PublicKey(public.to_bytes()),
        }
    }

    /// Create a keypair from raw 32-byte secret key material.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self::from_secret(StaticSecret::from_bytes(bytes))
    }

    /// Diffie-Hellman combine of this keypair's secret with a peer's
    /// public key.
    ///
    /// Both holders derive the identical 32-byte secret; an all-zeros
    /// result (low-order input, per RFC 7748 Section 6.1) is rejected.
    pub fn dh(&self, their: &PublicKey) -> Result<SharedSecret, Error> {
        let shared = self.secret.0.diffie_hellman(&DalekPublicKey::from(their.0));
        let is_zero = shared.as_bytes().ct_eq(&[0u8; 32]);
        if bool::from(is_zero) {
            Err(Error::DhFailure)
        } else {
            Ok(SharedSecret(*shared.as_bytes()))
        }
    }
}
