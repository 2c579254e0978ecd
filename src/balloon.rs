//! Memory-hard password hashing over the duplex sponge.
//!
//! Balloon-style construction: a buffer of `space_cost` 32-byte blocks is
//! filled from the password and salt, then mixed for `time_cost` rounds.
//! Each block absorbs its predecessor plus `DELTA` pseudo-randomly chosen
//! blocks per round, forcing the whole buffer to stay resident. Every
//! sub-hash is domain-separated by a strictly increasing call counter, so
//! no two sub-hashes in a derivation ever see identical input streams.

use zeroize::Zeroizing;

use crate::crypto::xoodyak::Xoodyak;

const BLOCK_LEN: usize = 32;

/// Number of pseudo-random dependencies mixed into each block per round.
const DELTA: u64 = 3;

/// One counter-separated sub-hash: a fresh unkeyed sponge absorbs the
/// counter, then each input as its own absorb call, and squeezes a block.
fn sub_hash(counter: &mut u64, inputs: &[&[u8]]) -> [u8; BLOCK_LEN] {
    let mut sponge = Xoodyak::hash();
    sponge.absorb_u64(*counter);
    *counter += 1;
    for input in inputs {
        sponge.absorb(input);
    }
    let mut block = [0u8; BLOCK_LEN];
    sponge.squeeze(&mut block);
    block
}

/// Derive a 32-byte hash from `password` and `salt`.
///
/// `space_cost` is the buffer size in 32-byte blocks and must be at least
/// one; `time_cost` is the number of mixing rounds over the whole buffer
/// and may be zero. Cost parameters are part of the hash: changing either
/// changes the output.
pub fn hash(password: &[u8], salt: &[u8], space_cost: u64, time_cost: u64) -> [u8; BLOCK_LEN] {
    assert!(space_cost >= 1, "space_cost must be at least one block");

    let mut counter: u64 = 0;
    let mut buffer: Zeroizing<Vec<[u8; BLOCK_LEN]>> =
        Zeroizing::new(Vec::with_capacity(space_cost as usize));

    buffer.push(sub_hash(&mut counter, &[password, salt]));
    for m in 1..space_cost as usize {
        let chained = sub_hash(&mut counter, &[&buffer[m - 1]]);
        buffer.push(chained);
    }

    for t in 0..time_cost {
        for m in 0..space_cost as usize {
            let previous = buffer[(m + space_cost as usize - 1) % space_cost as usize];
            buffer[m] = sub_hash(&mut counter, &[&previous, &buffer[m]]);

            for i in 0..DELTA {
                let mut sponge = Xoodyak::hash();
                sponge.absorb_u64(counter);
                counter += 1;
                sponge.absorb(salt);
                sponge.absorb_u64(t);
                sponge.absorb_u64(m as u64);
                sponge.absorb_u64(i);
                let mut index = [0u8; 8];
                sponge.squeeze(&mut index);
                let random = (u64::from_le_bytes(index) % space_cost) as usize;

                buffer[m] = sub_hash(&mut counter, &[&buffer[m], &buffer[random]]);
            }
        }
    }

    buffer[space_cost as usize - 1]
}
