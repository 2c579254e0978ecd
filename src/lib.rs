//! Authenticated key exchange and transport encryption built on a single
//! duplex sponge.
//!
//! Every symmetric operation in this crate — transcript hashing, handshake
//! encryption, transport encryption, key derivation and password hashing —
//! runs over the Xoodoo\[12\] permutation in Cyclist duplex mode. Key
//! agreement uses x25519. Nine handshake patterns are provided, named
//! after which static keys each side holds up front and how they travel:
//! one-way `N`, `K` and `X`, and interactive `NNpsk2`, `KK`, `NK`, `NX`,
//! `XX` and `IK`.
//!
//! The crate is sans-io: handshake and transport types operate on caller
//! buffers and never touch the network.
//!
//! ```
//! use rand_core::OsRng;
//! use xisco::{initiator, responder, KeyPair};
//!
//! let server_identity = KeyPair::generate(&mut OsRng);
//!
//! // The client knows the server's static key out of band.
//! let mut client = initiator::NK::new(server_identity.public);
//! let mut server = responder::NK::new(server_identity);
//!
//! let mut message1 = Vec::new();
//! client.write(&mut message1)?;
//! server.read(&message1)?;
//!
//! let mut message2 = Vec::new();
//! server.write(&mut message2)?;
//! client.read(&message2)?;
//!
//! let mut client_transport = client.finalize();
//! let mut server_transport = server.finalize();
//!
//! let mut ciphertext = Vec::new();
//! client_transport.encrypt(b"hello", None, &mut ciphertext);
//! let plaintext = server_transport.decrypt_to_vec(&ciphertext, None)?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), xisco::Error>(())
//! ```

#![deny(unsafe_code)]

pub mod balloon;
pub mod crypto;
pub mod error;
pub mod keys;

mod handshake;
mod symmetric_state;
mod transport;

pub use error::Error;
pub use handshake::{initiator, responder};
pub use keys::{KeyPair, PublicKey, SharedSecret, StaticSecret};
pub use transport::Xisco;

/// Length in bytes of every authentication tag.
pub const TAG_LEN: usize = 16;

/// Maximum total length in bytes of a single handshake or transport
/// message, associated data included.
pub const MAX_MESSAGE_LEN: usize = 65535;
