// ============================================================================
// src/sha1/x86.rs – SHA-NI compression step (x86 / x86_64 only)
// ============================================================================

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::block::{HashState, MessageBlock};

/// True when the running CPU exposes the SHA extensions plus SSE4.1.
pub fn is_supported() -> bool {
    is_x86_feature_detected!("sha")
        && is_x86_feature_detected!("sse2")
        && is_x86_feature_detected!("ssse3")
        && is_x86_feature_detected!("sse4.1")
}

/// Hardware compression step. Same contract as `portable::compress`.
///
/// Panics if the CPU lacks the required extensions.
pub fn compress(state: &HashState, block: &MessageBlock) -> HashState {
    assert!(is_supported(), "SHA-NI backend used on a CPU without SHA extensions");
    // SAFETY: the required target features were verified at runtime above.
    unsafe { compress_sha_ni(state, block) }
}

macro_rules! rounds4 {
    ($h0:ident, $h1:ident, $wk:expr, $i:expr) => {
        _mm_sha1rnds4_epu32($h0, _mm_sha1nexte_epu32($h1, $wk), $i)
    };
}

macro_rules! schedule {
    ($v0:expr, $v1:expr, $v2:expr, $v3:expr) => {
        _mm_sha1msg2_epu32(_mm_xor_si128(_mm_sha1msg1_epu32($v0, $v1), $v2), $v3)
    };
}

macro_rules! schedule_rounds4 {
    ($h0:ident, $h1:ident, $w0:expr, $w1:expr, $w2:expr, $w3:expr, $w4:expr, $i:expr) => {
        $w4 = schedule!($w0, $w1, $w2, $w3);
        $h1 = rounds4!($h0, $h1, $w4, $i);
    };
}

#[target_feature(enable = "sha,sse2,ssse3,sse4.1")]
unsafe fn compress_sha_ni(state: &HashState, block: &MessageBlock) -> HashState {
    let h = &state.0;
    let m = &block.0;

    // Word 0 lives in the highest lane, matching the sha1rnds4 layout.
    let abcd = _mm_set_epi32(h[0] as i32, h[1] as i32, h[2] as i32, h[3] as i32);
    let e0 = _mm_set_epi32(h[4] as i32, 0, 0, 0);

    let mut w0 = _mm_set_epi32(m[0] as i32, m[1] as i32, m[2] as i32, m[3] as i32);
    let mut w1 = _mm_set_epi32(m[4] as i32, m[5] as i32, m[6] as i32, m[7] as i32);
    let mut w2 = _mm_set_epi32(m[8] as i32, m[9] as i32, m[10] as i32, m[11] as i32);
    let mut w3 = _mm_set_epi32(m[12] as i32, m[13] as i32, m[14] as i32, m[15] as i32);
    let mut w4;

    let mut h0 = abcd;
    let mut h1 = _mm_add_epi32(e0, w0);

    // 0..20
    h1 = _mm_sha1rnds4_epu32(h0, h1, 0);
    h0 = rounds4!(h1, h0, w1, 0);
    h1 = rounds4!(h0, h1, w2, 0);
    h0 = rounds4!(h1, h0, w3, 0);
    schedule_rounds4!(h0, h1, w0, w1, w2, w3, w4, 0);

    // 20..40
    schedule_rounds4!(h1, h0, w1, w2, w3, w4, w0, 1);
    schedule_rounds4!(h0, h1, w2, w3, w4, w0, w1, 1);
    schedule_rounds4!(h1, h0, w3, w4, w0, w1, w2, 1);
    schedule_rounds4!(h0, h1, w4, w0, w1, w2, w3, 1);
    schedule_rounds4!(h1, h0, w0, w1, w2, w3, w4, 1);

    // 40..60
    schedule_rounds4!(h0, h1, w1, w2, w3, w4, w0, 2);
    schedule_rounds4!(h1, h0, w2, w3, w4, w0, w1, 2);
    schedule_rounds4!(h0, h1, w3, w4, w0, w1, w2, 2);
    schedule_rounds4!(h1, h0, w4, w0, w1, w2, w3, 2);
    schedule_rounds4!(h0, h1, w0, w1, w2, w3, w4, 2);

    // 60..80
    schedule_rounds4!(h1, h0, w1, w2, w3, w4, w0, 3);
    schedule_rounds4!(h0, h1, w2, w3, w4, w0, w1, 3);
    schedule_rounds4!(h1, h0, w3, w4, w0, w1, w2, 3);
    schedule_rounds4!(h0, h1, w4, w0, w1, w2, w3, 3);
    schedule_rounds4!(h1, h0, w0, w1, w2, w3, w4, 3);

    let abcd = _mm_add_epi32(abcd, h0);
    let e = _mm_sha1nexte_epu32(h1, e0);

    HashState([
        _mm_extract_epi32(abcd, 3) as u32,
        _mm_extract_epi32(abcd, 2) as u32,
        _mm_extract_epi32(abcd, 1) as u32,
        _mm_extract_epi32(abcd, 0) as u32,
        _mm_extract_epi32(e, 3) as u32,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha1::block::pad_block;
    use crate::sha1::portable;

    #[test]
    fn agrees_with_portable_when_available() {
        if !is_supported() {
            return;
        }
        let mut state = HashState::INIT;
        let mut block = pad_block(b"The quick brown fox jumps over the lazy dog", 0);
        for round in 0..64u32 {
            let hw = compress(&state, &block);
            let sw = portable::compress(&state, &block);
            assert_eq!(hw, sw, "diverged at round {round}");
            state = hw;
            block.0[(round % 16) as usize] ^= state.0[(round % 5) as usize];
        }
    }
}
