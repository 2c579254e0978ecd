//! Cryptographic primitives underneath the handshake engine.
//!
//! - [`xoodoo`]: the Xoodoo\[12\] permutation
//! - [`xoodyak`]: the Cyclist duplex sponge built on it
//!
//! The elliptic-curve group primitive lives in [`crate::keys`], on top of
//! `x25519-dalek`.

pub mod xoodoo;
pub mod xoodyak;
