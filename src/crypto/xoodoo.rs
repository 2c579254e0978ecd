//! The Xoodoo\[12\] permutation.
//!
//! Operates on a 384-bit state viewed as three planes of four 32-bit
//! little-endian lanes. This is the permutation underneath the Cyclist
//! duplex mode in [`super::xoodyak`].

/// Permutation state width in bytes.
pub const STATE_LEN: usize = 48;

const LANES: usize = 12;

/// Round constants for the 12-round variant, in application order.
const ROUND_CONSTANTS: [u32; 12] = [
    0x0000_0058,
    0x0000_0038,
    0x0000_03c0,
    0x0000_00d0,
    0x0000_0120,
    0x0000_0014,
    0x0000_0060,
    0x0000_002c,
    0x0000_0380,
    0x0000_00f0,
    0x0000_01a0,
    0x0000_0012,
];

/// Apply Xoodoo[12] to the state in place.
pub fn permute(state: &mut [u8; STATE_LEN]) {
    let mut lanes = [0u32; LANES];
    for (i, lane) in lanes.iter_mut().enumerate() {
        *lane = u32::from_le_bytes([
            state[4 * i],
            state[4 * i + 1],
            state[4 * i + 2],
            state[4 * i + 3],
        ]);
    }

    for &constant in &ROUND_CONSTANTS {
        round(&mut lanes, constant);
    }

    for (i, lane) in lanes.iter().enumerate() {
        state[4 * i..4 * i + 4].copy_from_slice(&lane.to_le_bytes());
    }
}

/// One Xoodoo round: theta, rho-west, iota, chi, rho-east.
///
/// Lane `x` of plane `y` lives at index `4*y + x`.
fn round(a: &mut [u32; LANES], constant: u32) {
    // theta: mix each column with the parity of the two columns to its west
    let mut p = [0u32; 4];
    for x in 0..4 {
        p[x] = a[x] ^ a[4 + x] ^ a[8 + x];
    }
    for x in 0..4 {
        let parity = p[(x + 3) % 4];
        let e = parity.rotate_left(5) ^ parity.rotate_left(14);
        a[x] ^= e;
        a[4 + x] ^= e;
        a[8 + x] ^= e;
    }

    // rho-west: plane 1 shifts one lane, plane 2 rotates within lanes
    let shifted = [a[7], a[4], a[5], a[6]];
    a[4..8].copy_from_slice(&shifted);
    for x in 0..4 {
        a[8 + x] = a[8 + x].rotate_left(11);
    }

    // iota
    a[0] ^= constant;

    // chi: nonlinear column update
    for x in 0..4 {
        let b0 = !a[4 + x] & a[8 + x];
        let b1 = !a[8 + x] & a[x];
        let b2 = !a[x] & a[4 + x];
        a[x] ^= b0;
        a[4 + x] ^= b1;
        a[8 + x] ^= b2;
    }

    // rho-east: plane 1 rotates within lanes, plane 2 shifts two lanes and rotates
    for x in 0..4 {
        a[4 + x] = a[4 + x].rotate_left(1);
    }
    let shifted = [
        a[10].rotate_left(8),
        a[11].rotate_left(8),
        a[8].rotate_left(8),
        a[9].rotate_left(8),
    ];
    a[8..12].copy_from_slice(&shifted);
}
