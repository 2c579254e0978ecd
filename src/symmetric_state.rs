use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::xoodyak::Xoodyak;
use crate::error::Error;
use crate::TAG_LEN;

/// The running handshake transcript.
///
/// Wraps one duplex sponge seeded with the protocol id. Every public key,
/// ciphertext and mixed secret of the handshake flows through it, so two
/// peers that processed the same messages hold identical states.
pub(crate) struct SymmetricState {
    sponge: Xoodyak,
    /// Set by the first `mix_key` and never unset. Encryption before any
    /// key material was mixed in is a protocol bug, not a runtime input.
    is_keyed: bool,
}

impl SymmetricState {
    /// Seed the transcript with a domain-separation id such as
    /// `"Xisco-v0_XX"`. Peers disagreeing on the id (or pattern spelling)
    /// never interoperate.
    pub fn new(protocol_id: &[u8]) -> Self {
        Self {
            sponge: Xoodyak::keyed(&[], protocol_id, &[]),
            is_keyed: false,
        }
    }

    /// Absorb public data (keys, prior ciphertexts) into the transcript.
    pub fn mix_hash(&mut self, data: &[u8]) {
        self.sponge.absorb(data);
    }

    /// Absorb a secret (DH output or PSK) into the transcript.
    pub fn mix_key(&mut self, secret: &[u8]) {
        self.sponge.absorb(secret);
        self.is_keyed = true;
    }

    /// Duplex-encrypt `plaintext` and append ciphertext plus a squeezed
    /// authentication tag to `out`.
    pub fn encrypt(&mut self, plaintext: &[u8], out: &mut Vec<u8>) {
        assert!(self.is_keyed, "encrypt before any key was mixed in");
        self.sponge.encrypt(plaintext, out);
        let mut tag = [0u8; TAG_LEN];
        self.sponge.squeeze(&mut tag);
        out.extend_from_slice(&tag);
    }

    /// Inverse of [`SymmetricState::encrypt`]; appends the plaintext to
    /// `out`. On tag mismatch the produced plaintext is wiped and removed
    /// from `out` before the error is returned.
    pub fn decrypt(&mut self, ciphertext: &[u8], out: &mut Vec<u8>) -> Result<(), Error> {
        assert!(self.is_keyed, "decrypt before any key was mixed in");
        if ciphertext.len() < TAG_LEN {
            return Err(Error::CiphertextTooShort);
        }
        let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_LEN);

        let start = out.len();
        self.sponge.decrypt(body, out);
        let mut expected = [0u8; TAG_LEN];
        self.sponge.squeeze(&mut expected);

        if !bool::from(tag.ct_eq(&expected)) {
            out[start..].zeroize();
            out.truncate(start);
            return Err(Error::MessageCorrupted);
        }
        Ok(())
    }

    /// Convenience form of [`SymmetricState::decrypt`] returning a fresh
    /// buffer.
    pub fn decrypt_to_vec(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(ciphertext.len().saturating_sub(TAG_LEN));
        self.decrypt(ciphertext, &mut out)?;
        Ok(out)
    }

    /// Squeeze key material out of the finished transcript.
    pub fn squeeze_key(&mut self, out: &mut [u8]) {
        self.sponge.squeeze_key(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_pair() -> (SymmetricState, SymmetricState) {
        let mut a = SymmetricState::new(b"Xisco-v0_test");
        let mut b = SymmetricState::new(b"Xisco-v0_test");
        a.mix_hash(b"transcript data");
        b.mix_hash(b"transcript data");
        a.mix_key(b"a 32-byte shared secret.........");
        b.mix_key(b"a 32-byte shared secret.........");
        (a, b)
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let (mut a, mut b) = keyed_pair();

        let mut ciphertext = Vec::new();
        a.encrypt(b"payload", &mut ciphertext);
        assert_eq!(ciphertext.len(), 7 + TAG_LEN);

        let plaintext = b.decrypt_to_vec(&ciphertext).unwrap();
        assert_eq!(&plaintext[..], b"payload");
    }

    #[test]
    fn tampered_ciphertext_is_rejected_and_wiped() {
        let (mut a, mut b) = keyed_pair();

        let mut ciphertext = Vec::new();
        a.encrypt(b"payload", &mut ciphertext);
        ciphertext[0] ^= 0x01;

        let mut out = vec![0xaa];
        let err = b.decrypt(&ciphertext, &mut out).unwrap_err();
        assert_eq!(err, Error::MessageCorrupted);
        // Prior contents survive, the rejected plaintext does not.
        assert_eq!(out, vec![0xaa]);
    }

    #[test]
    fn tampered_tag_is_rejected() {
        let (mut a, mut b) = keyed_pair();

        let mut ciphertext = Vec::new();
        a.encrypt(b"payload", &mut ciphertext);
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x80;

        assert_eq!(
            b.decrypt_to_vec(&ciphertext).unwrap_err(),
            Error::MessageCorrupted
        );
    }

    #[test]
    fn short_input_is_rejected_before_any_work() {
        let (_, mut b) = keyed_pair();
        assert_eq!(
            b.decrypt_to_vec(&[0u8; TAG_LEN - 1]).unwrap_err(),
            Error::CiphertextTooShort
        );
    }

    #[test]
    #[should_panic(expected = "before any key")]
    fn encrypt_without_key_panics() {
        let mut state = SymmetricState::new(b"Xisco-v0_test");
        state.mix_hash(b"public data only");
        state.encrypt(b"payload", &mut Vec::new());
    }

    #[test]
    fn different_protocol_ids_do_not_interoperate() {
        let mut a = SymmetricState::new(b"Xisco-v0_XX");
        let mut b = SymmetricState::new(b"Xisco-v0_xx");
        a.mix_key(b"shared");
        b.mix_key(b"shared");

        let mut ciphertext = Vec::new();
        a.encrypt(b"payload", &mut ciphertext);
        assert_eq!(
            b.decrypt_to_vec(&ciphertext).unwrap_err(),
            Error::MessageCorrupted
        );
    }
}
