use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::crypto::xoodyak::Xoodyak;
use crate::error::Error;
use crate::handshake::Role;
use crate::{MAX_MESSAGE_LEN, TAG_LEN};

/// The bidirectional transport cipher derived from a finished handshake.
///
/// Two independent sponge lanes — send and receive — each with a strictly
/// increasing implicit nonce. Messages must be decrypted in exactly the
/// order they were encrypted: the nonce never travels on the wire, so any
/// gap, reorder or replay desynchronizes the lane and every subsequent
/// message fails authentication.
///
/// The first authentication failure permanently aborts the instance;
/// discard it and run a fresh handshake.
pub struct Xisco {
    sender: Xoodyak,
    sender_nonce: u64,
    receiver: Xoodyak,
    receiver_nonce: u64,
    aborted: bool,
}

impl Xisco {
    /// Seed both lanes from the handshake root key.
    ///
    /// The lane ids are the role byte and its bitwise complement, so the
    /// initiator's send lane carries the same key material layout as the
    /// responder's receive lane while remaining a distinct sponge
    /// instantiation.
    pub(crate) fn new(key: &[u8], role: Role) -> Self {
        let role_byte = role as u8;
        Self {
            sender: Xoodyak::keyed(key, &[role_byte], &[]),
            sender_nonce: 0,
            receiver: Xoodyak::keyed(key, &[!role_byte], &[]),
            receiver_nonce: 0,
            aborted: false,
        }
    }

    /// Encrypt a message for the peer, appending ciphertext (equal in
    /// length to the plaintext) plus a 16-byte tag to `ciphertext`.
    ///
    /// The persistent send lane is never touched directly: a disposable
    /// branch absorbs the nonce and associated data and carries the
    /// whole operation. The nonce advances by exactly one per call.
    pub fn encrypt(&mut self, plaintext: &[u8], ad: Option<&[u8]>, ciphertext: &mut Vec<u8>) {
        assert!(!self.aborted, "transport cipher is aborted");
        assert!(
            plaintext.len() + TAG_LEN + ad.map_or(0, <[u8]>::len) <= MAX_MESSAGE_LEN,
            "transport message exceeds maximum length"
        );
        assert!(self.sender_nonce < u64::MAX, "sender nonce exhausted");

        let mut lane = self.sender.branch();
        lane.absorb_u64(self.sender_nonce);
        if let Some(ad) = ad {
            lane.absorb(ad);
        }
        lane.encrypt(plaintext, ciphertext);
        let mut tag = [0u8; TAG_LEN];
        lane.squeeze(&mut tag);
        ciphertext.extend_from_slice(&tag);

        self.sender_nonce += 1;
    }

    /// Decrypt a message from the peer, appending the plaintext to
    /// `plaintext`.
    ///
    /// On tag mismatch the produced plaintext is wiped, the cipher is
    /// permanently aborted and `MessageCorrupted` is returned; the nonce
    /// only advances on success.
    pub fn decrypt(
        &mut self,
        ciphertext: &[u8],
        ad: Option<&[u8]>,
        plaintext: &mut Vec<u8>,
    ) -> Result<(), Error> {
        assert!(!self.aborted, "transport cipher is aborted");
        assert!(
            ciphertext.len() + ad.map_or(0, <[u8]>::len) <= MAX_MESSAGE_LEN,
            "transport message exceeds maximum length"
        );
        assert!(self.receiver_nonce < u64::MAX, "receiver nonce exhausted");
        if ciphertext.len() < TAG_LEN {
            return Err(Error::CiphertextTooShort);
        }

        let mut lane = self.receiver.branch();
        lane.absorb_u64(self.receiver_nonce);
        if let Some(ad) = ad {
            lane.absorb(ad);
        }
        let (body, tag) = ciphertext.split_at(ciphertext.len() - TAG_LEN);
        let start = plaintext.len();
        lane.decrypt(body, plaintext);
        let mut expected = [0u8; TAG_LEN];
        lane.squeeze(&mut expected);

        if !bool::from(tag.ct_eq(&expected)) {
            plaintext[start..].zeroize();
            plaintext.truncate(start);
            self.aborted = true;
            return Err(Error::MessageCorrupted);
        }

        self.receiver_nonce += 1;
        Ok(())
    }

    /// Convenience form of [`Xisco::decrypt`] returning a fresh buffer.
    pub fn decrypt_to_vec(&mut self, ciphertext: &[u8], ad: Option<&[u8]>) -> Result<Vec<u8>, Error> {
        let mut plaintext = Vec::with_capacity(ciphertext.len().saturating_sub(TAG_LEN));
        self.decrypt(ciphertext, ad, &mut plaintext)?;
        Ok(plaintext)
    }

    /// Irreversibly ratchet the send lane. Prior send keys cannot be
    /// recovered; the nonce counter is not reset.
    pub fn rekey_sender(&mut self) {
        assert!(!self.aborted, "transport cipher is aborted");
        self.sender.ratchet();
    }

    /// Irreversibly ratchet the receive lane.
    pub fn rekey_receiver(&mut self) {
        assert!(!self.aborted, "transport cipher is aborted");
        self.receiver.ratchet();
    }

    /// Ratchet both lanes.
    pub fn rekey(&mut self) {
        self.rekey_sender();
        self.rekey_receiver();
    }

    /// Whether an authentication failure has permanently disabled this
    /// cipher.
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }
}
