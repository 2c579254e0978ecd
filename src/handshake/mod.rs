//! Handshake pattern state machines.
//!
//! Each pattern is a fixed, named sequence of directional messages. The
//! per-pattern types live in [`initiator`] and [`responder`]; the shared
//! [`Driver`] enforces strict operation ordering, tracks where caller
//! payload begins in the current message, and finalizes the transcript
//! into a [`Xisco`] transport cipher.
//!
//! ```text
//! First pattern character        Second pattern character
//!  N = No static key             N = No static key
//!  K = statically Known          K = statically Known
//!  X = transmitted (encrypted)   X = transmitted (encrypted)
//!  I = immediately transmitted
//! ```

use zeroize::Zeroizing;

use crate::error::Error;
use crate::keys::{PublicKey, SharedSecret};
use crate::symmetric_state::SymmetricState;
use crate::transport::Xisco;
use crate::{MAX_MESSAGE_LEN, TAG_LEN};

pub mod initiator;
pub mod responder;

/// Protocol version, part of every domain-separation id.
pub(crate) const VERSION: u32 = 0;

/// Which side of the handshake this state machine drives.
///
/// The role byte and its bitwise complement seed the two transport lanes,
/// so the initiator's send lane lines up with the responder's receive
/// lane and a direction mix-up cannot silently succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Initiator = 0x00,
    Responder = 0xff,
}

/// Shared sequencing and transcript state embedded in every pattern type.
///
/// Patterns differ only in which keys they hold and which mix operations
/// each step performs; ordering, payload offsets and finalization are
/// common.
pub(crate) struct Driver {
    role: Role,
    pub(crate) symmetric: SymmetricState,
    operation: u32,
    /// Byte offset where caller payload begins in the current message:
    /// past the pattern's fixed fields.
    offset: usize,
}

impl Driver {
    pub fn new(role: Role, pattern: &str) -> Self {
        let protocol_id = format!("Xisco-v{VERSION}_{pattern}");
        Self {
            role,
            symmetric: SymmetricState::new(protocol_id.as_bytes()),
            operation: 1,
            offset: 0,
        }
    }

    /// Advance to protocol message `order`, recording the length of the
    /// message's fixed fields. Out-of-order calls are caller bugs.
    pub fn step(&mut self, order: u32, fixed_len: usize) {
        assert_eq!(
            self.operation, order,
            "handshake operation out of sequence"
        );
        self.operation += 1;
        self.offset = fixed_len;
    }

    pub fn mix_hash(&mut self, key: &PublicKey) {
        self.symmetric.mix_hash(key.as_bytes());
    }

    pub fn mix_key(&mut self, secret: SharedSecret) {
        self.symmetric.mix_key(secret.as_bytes());
    }

    pub fn mix_psk(&mut self, psk: &[u8]) {
        self.symmetric.mix_key(psk);
    }

    /// Append a public key to the outgoing message, encrypted and tagged
    /// under the current transcript.
    pub fn encrypt_key(&mut self, key: &PublicKey, buffer: &mut Vec<u8>) {
        self.symmetric.encrypt(key.as_bytes(), buffer);
    }

    /// Decrypt a transmitted public key from its fixed position in the
    /// incoming message.
    pub fn decrypt_key(&mut self, sealed: &[u8]) -> Result<PublicKey, Error> {
        let opened = Zeroizing::new(self.symmetric.decrypt_to_vec(sealed)?);
        PublicKey::read_from(&opened)
    }

    /// Encrypt caller payload for the current message, appending
    /// ciphertext and tag to `buffer` after the pattern's fixed fields.
    pub fn encrypt_payload(&mut self, payload: &[u8], buffer: &mut Vec<u8>) {
        assert!(
            self.offset + payload.len() <= MAX_MESSAGE_LEN,
            "handshake message exceeds maximum length"
        );
        self.symmetric.encrypt(payload, buffer);
    }

    /// Decrypt the caller payload of the current message, skipping the
    /// pattern's fixed fields at the front of `buffer`.
    pub fn decrypt_payload(&mut self, buffer: &[u8]) -> Result<Vec<u8>, Error> {
        assert!(
            buffer.len() <= MAX_MESSAGE_LEN,
            "handshake message exceeds maximum length"
        );
        let body = buffer.get(self.offset..).ok_or(Error::CiphertextTooShort)?;
        self.symmetric.decrypt_to_vec(body)
    }

    /// Consume the finished handshake: squeeze the 32-byte root key from
    /// the transcript and seed the two transport lanes from it.
    pub fn finalize(mut self) -> Xisco {
        let mut root = Zeroizing::new([0u8; 32]);
        self.symmetric.squeeze_key(&mut *root);
        Xisco::new(&*root, self.role)
    }
}

/// Fixed-field length of a message carrying only a plaintext ephemeral.
pub(crate) const PLAIN_KEY: usize = PublicKey::LEN;
/// Fixed-field length of a message carrying a plaintext ephemeral plus an
/// encrypted static key.
pub(crate) const PLAIN_AND_SEALED_KEY: usize = 2 * PublicKey::LEN + TAG_LEN;
/// Fixed-field length of a message carrying only an encrypted static key.
pub(crate) const SEALED_KEY: usize = PublicKey::LEN + TAG_LEN;

/// Forward the caller-facing payload and finalize operations from a
/// pattern type to its embedded [`Driver`].
macro_rules! delegate_driver {
    ($pattern:ident) => {
        impl $pattern {
            /// Encrypt application payload into the current handshake
            /// message, after the pattern's fixed fields.
            pub fn encrypt_payload(&mut self, payload: &[u8], buffer: &mut Vec<u8>) {
                self.driver.encrypt_payload(payload, buffer)
            }

            /// Decrypt the application payload of the current handshake
            /// message.
            pub fn decrypt_payload(&mut self, buffer: &[u8]) -> Result<Vec<u8>, Error> {
                self.driver.decrypt_payload(buffer)
            }

            /// Consume the finished handshake and derive the transport
            /// cipher. No further handshake calls can be made.
            pub fn finalize(self) -> Xisco {
                self.driver.finalize()
            }
        }
    };
}

pub(crate) use delegate_driver;
