// ============================================================================
// src/sha1/block.rs – Message block / hash state types and byte-order helpers
// ============================================================================

use zeroize::Zeroize;

/// SHA-1 block size in bytes.
pub const BLOCK_LEN: usize = 64;
/// SHA-1 output size in bytes.
pub const DIGEST_LEN: usize = 20;
/// Longest message that still pads into a single block (0x80 + 8-byte length).
pub const MAX_SINGLE_BLOCK_MSG: usize = BLOCK_LEN - 9;

/// Read a big-endian u32 from the first four bytes of `b`.
#[inline(always)]
pub fn read_u32_be(b: &[u8]) -> u32 {
    assert!(b.len() >= 4, "read_u32_be needs 4 bytes, got {}", b.len());
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Write `x` big-endian into the first four bytes of `b`.
#[inline(always)]
pub fn write_u32_be(b: &mut [u8], x: u32) {
    assert!(b.len() >= 4, "write_u32_be needs 4 bytes, got {}", b.len());
    b[..4].copy_from_slice(&x.to_be_bytes());
}

/// One 512-bit message block as sixteen big-endian words.
///
/// The compression step also uses a copy of it as the circular
/// message schedule, so only 16 of the 80 schedule words live at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct MessageBlock(pub [u32; 16]);

impl MessageBlock {
    /// Load a block from 64 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= BLOCK_LEN,
            "message block needs {BLOCK_LEN} bytes, got {}",
            bytes.len()
        );
        let mut w = [0u32; 16];
        for (i, word) in w.iter_mut().enumerate() {
            *word = read_u32_be(&bytes[i * 4..]);
        }
        Self(w)
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_LEN] {
        let mut out = [0u8; BLOCK_LEN];
        for (i, word) in self.0.iter().enumerate() {
            write_u32_be(&mut out[i * 4..], *word);
        }
        out
    }

    /// Block carrying a 20-byte hash output, padded as the tail of a
    /// message whose first `BLOCK_LEN` bytes were the HMAC key block.
    ///
    /// The padding words never change, so the PBKDF2 loop only rewrites
    /// words 0..5 of a block built once by this function.
    pub fn for_digest(state: &HashState) -> Self {
        let mut w = [0u32; 16];
        w[..5].copy_from_slice(&state.0);
        w[5] = 0x8000_0000;
        w[15] = ((BLOCK_LEN + DIGEST_LEN) * 8) as u32;
        Self(w)
    }

    /// Overwrite the leading five words with a hash output.
    #[inline(always)]
    pub fn set_digest(&mut self, state: &HashState) {
        self.0[..5].copy_from_slice(&state.0);
    }
}

/// The 160-bit SHA-1 chaining value (a, b, c, d, e).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct HashState(pub [u32; 5]);

impl HashState {
    /// FIPS 180 initial hash value.
    pub const INIT: Self = Self([
        0x6745_2301,
        0xEFCD_AB89,
        0x98BA_DCFE,
        0x1032_5476,
        0xC3D2_E1F0,
    ]);

    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() >= DIGEST_LEN,
            "hash state needs {DIGEST_LEN} bytes, got {}",
            bytes.len()
        );
        let mut h = [0u32; 5];
        for (i, word) in h.iter_mut().enumerate() {
            *word = read_u32_be(&bytes[i * 4..]);
        }
        Self(h)
    }

    pub fn to_bytes(&self) -> [u8; DIGEST_LEN] {
        let mut out = [0u8; DIGEST_LEN];
        self.write_to(&mut out);
        out
    }

    /// Write the state big-endian into the first 20 bytes of `out`.
    pub fn write_to(&self, out: &mut [u8]) {
        assert!(
            out.len() >= DIGEST_LEN,
            "hash output needs {DIGEST_LEN} bytes, got {}",
            out.len()
        );
        for (i, word) in self.0.iter().enumerate() {
            write_u32_be(&mut out[i * 4..], *word);
        }
    }

    /// Component-wise XOR, used for the PBKDF2 accumulator.
    #[inline(always)]
    pub fn xor_assign(&mut self, other: &HashState) {
        for (a, b) in self.0.iter_mut().zip(other.0.iter()) {
            *a ^= *b;
        }
    }
}

/// Pad `message` into one SHA-1 block.
///
/// `prefix_len` is the number of bytes already absorbed before this block
/// (64 when continuing from an HMAC key block, 0 for a bare message); it
/// only feeds the encoded bit length.
pub fn pad_block(message: &[u8], prefix_len: usize) -> MessageBlock {
    assert!(
        message.len() <= MAX_SINGLE_BLOCK_MSG,
        "message of {} bytes does not pad into one block",
        message.len()
    );
    let mut buf = [0u8; BLOCK_LEN];
    buf[..message.len()].copy_from_slice(message);
    buf[message.len()] = 0x80;
    let bits = ((prefix_len + message.len()) as u64) * 8;
    buf[BLOCK_LEN - 8..].copy_from_slice(&bits.to_be_bytes());
    let block = MessageBlock::from_bytes(&buf);
    buf.zeroize();
    block
}
