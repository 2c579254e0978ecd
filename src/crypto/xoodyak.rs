//! The Cyclist duplex mode over Xoodoo\[12\].
//!
//! One [`Xoodyak`] instance is a keyed or unkeyed sponge supporting
//! `absorb`, `squeeze`, duplex `encrypt`/`decrypt` and an irreversible
//! `ratchet`. The transport cipher never mutates its long-lived lanes
//! directly; it takes a [`Xoodyak::branch`] copy per message.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::xoodoo::{self, STATE_LEN};

/// Absorb rate in unkeyed (hash) mode.
const HASH_RATE: usize = 16;
/// Absorb rate in keyed mode.
const KEYED_ABSORB_RATE: usize = 44;
/// Squeeze rate in keyed mode.
const KEYED_SQUEEZE_RATE: usize = 24;
/// Bytes squeezed and re-absorbed by a ratchet.
const RATCHET_LEN: usize = 16;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Hash,
    Keyed,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Up,
    Down,
}

/// A Cyclist duplex sponge.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Xoodyak {
    state: [u8; STATE_LEN],
    #[zeroize(skip)]
    mode: Mode,
    #[zeroize(skip)]
    phase: Phase,
}

impl Xoodyak {
    /// Create an unkeyed sponge for hashing.
    pub fn hash() -> Self {
        Self {
            state: [0u8; STATE_LEN],
            mode: Mode::Hash,
            phase: Phase::Up,
        }
    }

    /// Create a keyed sponge from a key, a domain-separation id and an
    /// optional counter.
    ///
    /// An empty key is permitted: the handshake transcript starts keyless
    /// and tracks its own keyed-ness at the protocol level.
    pub fn keyed(key: &[u8], id: &[u8], counter: &[u8]) -> Self {
        assert!(id.len() <= 255, "domain-separation id too long");

        let mut sponge = Self {
            state: [0u8; STATE_LEN],
            mode: Mode::Keyed,
            phase: Phase::Up,
        };

        let mut input = Zeroizing::new(Vec::with_capacity(key.len() + id.len() + 1));
        input.extend_from_slice(key);
        input.extend_from_slice(id);
        input.push(id.len() as u8);
        sponge.absorb_any(&input, KEYED_ABSORB_RATE, 0x02);

        if !counter.is_empty() {
            sponge.absorb_any(counter, 1, 0x00);
        }
        sponge
    }

    /// An independent copy of the sponge for one disposable operation.
    ///
    /// The persistent state is left untouched; the copy is meant to be
    /// dropped at the end of the call that took it.
    pub fn branch(&self) -> Self {
        self.clone()
    }

    /// Mix data into the state.
    pub fn absorb(&mut self, data: &[u8]) {
        self.absorb_any(data, self.absorb_rate(), 0x03);
    }

    /// Mix a counter into the state as a fixed-width little-endian integer.
    pub fn absorb_u64(&mut self, n: u64) {
        self.absorb(&n.to_le_bytes());
    }

    /// Extract pseudorandom output.
    pub fn squeeze(&mut self, out: &mut [u8]) {
        self.squeeze_any(out, 0x40);
    }

    /// Extract key material. Keyed mode only.
    pub fn squeeze_key(&mut self, out: &mut [u8]) {
        assert!(self.mode == Mode::Keyed, "squeeze_key on an unkeyed sponge");
        self.squeeze_any(out, 0x20);
    }

    /// Duplex-encrypt: XOR the plaintext with keystream while absorbing it.
    /// The ciphertext is appended to `out`. Keyed mode only.
    pub fn encrypt(&mut self, plaintext: &[u8], out: &mut Vec<u8>) {
        self.crypt(plaintext, out, false);
    }

    /// Inverse of [`Xoodyak::encrypt`]. The plaintext is appended to `out`.
    pub fn decrypt(&mut self, ciphertext: &[u8], out: &mut Vec<u8>) {
        self.crypt(ciphertext, out, true);
    }

    /// Irreversibly update the state: prior keys cannot be recovered from
    /// the post-ratchet sponge. Keyed mode only.
    pub fn ratchet(&mut self) {
        assert!(self.mode == Mode::Keyed, "ratchet on an unkeyed sponge");
        let mut rolled = Zeroizing::new([0u8; RATCHET_LEN]);
        self.squeeze_any(&mut *rolled, 0x10);
        self.absorb_any(&rolled[..], self.absorb_rate(), 0x00);
    }

    fn absorb_rate(&self) -> usize {
        match self.mode {
            Mode::Hash => HASH_RATE,
            Mode::Keyed => KEYED_ABSORB_RATE,
        }
    }

    fn squeeze_rate(&self) -> usize {
        match self.mode {
            Mode::Hash => HASH_RATE,
            Mode::Keyed => KEYED_SQUEEZE_RATE,
        }
    }

    fn absorb_any(&mut self, data: &[u8], rate: usize, mut frame: u8) {
        let mut offset = 0;
        loop {
            let take = (data.len() - offset).min(rate);
            if self.phase != Phase::Up {
                self.up(0x00);
            }
            self.down(&data[offset..offset + take], frame);
            frame = 0x00;
            offset += take;
            if offset == data.len() {
                break;
            }
        }
    }

    fn squeeze_any(&mut self, out: &mut [u8], mut frame: u8) {
        let rate = self.squeeze_rate();
        let mut offset = 0;
        loop {
            if offset > 0 {
                self.down(&[], 0x00);
            }
            self.up(frame);
            frame = 0x00;
            let take = (out.len() - offset).min(rate);
            out[offset..offset + take].copy_from_slice(&self.state[..take]);
            offset += take;
            if offset == out.len() {
                break;
            }
        }
    }

    fn crypt(&mut self, input: &[u8], out: &mut Vec<u8>, decrypting: bool) {
        assert!(self.mode == Mode::Keyed, "duplex encryption on an unkeyed sponge");
        let mut frame = 0x80u8;
        let mut offset = 0;
        loop {
            let take = (input.len() - offset).min(KEYED_SQUEEZE_RATE);
            let chunk = &input[offset..offset + take];

            self.up(frame);
            frame = 0x00;

            let mut block = Zeroizing::new([0u8; KEYED_SQUEEZE_RATE]);
            for (i, byte) in chunk.iter().enumerate() {
                block[i] = byte ^ self.state[i];
            }
            // The state always absorbs the plaintext side of the operation.
            if decrypting {
                self.down(&block[..take], 0x00);
            } else {
                self.down(chunk, 0x00);
            }
            out.extend_from_slice(&block[..take]);

            offset += take;
            if offset == input.len() {
                break;
            }
        }
    }

    fn down(&mut self, block: &[u8], frame: u8) {
        self.phase = Phase::Down;
        for (i, byte) in block.iter().enumerate() {
            self.state[i] ^= byte;
        }
        self.state[block.len()] ^= 0x01;
        self.state[STATE_LEN - 1] ^= if self.mode == Mode::Hash {
            frame & 0x01
        } else {
            frame
        };
    }

    fn up(&mut self, frame: u8) {
        self.phase = Phase::Up;
        if self.mode == Mode::Keyed {
            self.state[STATE_LEN - 1] ^= frame;
        }
        xoodoo::permute(&mut self.state);
    }
}
