// ============================================================================
// src/sha1/portable.rs – Reference SHA-1 compression step (FIPS 180-4)
// ============================================================================

use super::block::{HashState, MessageBlock};

const K0: u32 = 0x5A82_7999;
const K1: u32 = 0x6ED9_EBA1;
const K2: u32 = 0x8F1B_BCDC;
const K3: u32 = 0xCA62_C1D6;

/// Expand schedule word `i` (16..80) in place at slot `i & 15`.
///
/// Slot `i & 15` still holds w[i-16] when it is read here, so the read
/// must happen before the store.
#[inline(always)]
fn schedule(w: &mut [u32; 16], i: usize) -> u32 {
    let x = w[(i - 3) & 0xf] ^ w[(i - 8) & 0xf] ^ w[(i - 14) & 0xf] ^ w[i & 0xf];
    let x = x.rotate_left(1);
    w[i & 0xf] = x;
    x
}

/// Run one SHA-1 compression of `block` on top of `state`.
pub fn compress(state: &HashState, block: &MessageBlock) -> HashState {
    let mut w = block.0;
    let [mut a, mut b, mut c, mut d, mut e] = state.0;

    macro_rules! step {
        ($f:expr, $k:expr, $wi:expr) => {{
            let t = a
                .rotate_left(5)
                .wrapping_add($f)
                .wrapping_add(e)
                .wrapping_add($wi)
                .wrapping_add($k);
            e = d;
            d = c;
            c = b.rotate_left(30);
            b = a;
            a = t;
        }};
    }

    // Each 20-step round differs only in f and K.
    for i in 0..16 {
        step!((b & c) | (!b & d), K0, w[i]);
    }
    for i in 16..20 {
        let wi = schedule(&mut w, i);
        step!((b & c) | (!b & d), K0, wi);
    }
    for i in 20..40 {
        let wi = schedule(&mut w, i);
        step!(b ^ c ^ d, K1, wi);
    }
    for i in 40..60 {
        let wi = schedule(&mut w, i);
        step!((b & c) | (b & d) | (c & d), K2, wi);
    }
    for i in 60..80 {
        let wi = schedule(&mut w, i);
        step!(b ^ c ^ d, K3, wi);
    }

    let h = &state.0;
    HashState([
        h[0].wrapping_add(a),
        h[1].wrapping_add(b),
        h[2].wrapping_add(c),
        h[3].wrapping_add(d),
        h[4].wrapping_add(e),
    ])
}
