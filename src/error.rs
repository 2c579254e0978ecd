/// Errors surfaced to callers by the handshake engine and transport cipher.
///
/// Only conditions caused by peer-supplied input are errors. Misuse of the API
/// itself (operations out of sequence, use after abort, oversized messages,
/// nonce exhaustion) indicates a caller bug and panics instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input is shorter than the fixed fields and authentication tag
    /// require — a truncated or malformed message.
    CiphertextTooShort,
    /// Tag verification failed. For the transport cipher this additionally
    /// aborts the cipher instance for good.
    MessageCorrupted,
    /// A Diffie-Hellman combine produced an invalid or identity result.
    /// The handshake must be abandoned, not retried with the same keys.
    DhFailure,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CiphertextTooShort => write!(f, "ciphertext shorter than authentication tag"),
            Self::MessageCorrupted => write!(f, "message authentication failed"),
            Self::DhFailure => write!(f, "Diffie-Hellman combine produced an invalid result"),
        }
    }
}

impl core::error::Error for Error {}
