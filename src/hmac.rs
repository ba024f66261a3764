// ============================================================================
// src/hmac.rs – HMAC-SHA1 with the key block absorbed once (FIPS 198-1)
// ============================================================================

use crate::sha1::block::{pad_block, MAX_SINGLE_BLOCK_MSG};
use crate::sha1::{sha1_digest, Backend, Compress, HashState, MessageBlock, BLOCK_LEN};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// SHA-1 states after absorbing `key ^ ipad` and `key ^ opad`.
///
/// Both states stand in for the SHA-1 initial value on every HMAC
/// evaluation keyed with the same password.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacContext {
    inner: HashState,
    outer: HashState,
    #[zeroize(skip)]
    backend: Backend,
}

impl HmacContext {
    pub fn new(password: &[u8]) -> Self {
        Self::with_backend(password, Backend::detect())
    }

    pub fn with_backend(password: &[u8], backend: Backend) -> Self {
        let mut key = [0u8; BLOCK_LEN];
        if password.len() > BLOCK_LEN {
            let mut digest = sha1_digest(password);
            key[..digest.len()].copy_from_slice(&digest);
            digest.zeroize();
        } else {
            key[..password.len()].copy_from_slice(password);
        }

        let mut pad = [0u8; BLOCK_LEN];
        for (p, k) in pad.iter_mut().zip(key.iter()) {
            *p = k ^ IPAD;
        }
        let mut block = MessageBlock::from_bytes(&pad);
        let inner = backend.compress(&HashState::INIT, &block);

        for (p, k) in pad.iter_mut().zip(key.iter()) {
            *p = k ^ OPAD;
        }
        block = MessageBlock::from_bytes(&pad);
        let outer = backend.compress(&HashState::INIT, &block);

        key.zeroize();
        pad.zeroize();
        block.zeroize();

        Self {
            inner,
            outer,
            backend,
        }
    }

    pub fn inner(&self) -> &HashState {
        &self.inner
    }

    pub fn outer(&self) -> &HashState {
        &self.outer
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// HMAC-SHA1 of a message short enough to pad into one block.
    ///
    /// Panics when `message` is longer than 55 bytes.
    pub fn mac_single_block(&self, message: &[u8]) -> HashState {
        assert!(
            message.len() <= MAX_SINGLE_BLOCK_MSG,
            "HMAC fast path takes at most {MAX_SINGLE_BLOCK_MSG} bytes, got {}",
            message.len()
        );
        let mut block = pad_block(message, BLOCK_LEN);
        let t = self.backend.compress(&self.inner, &block);
        block = MessageBlock::for_digest(&t);
        let mac = self.backend.compress(&self.outer, &block);
        block.zeroize();
        mac
    }

    /// One HMAC evaluation over a previous 20-byte output.
    ///
    /// `scratch` must come from `MessageBlock::for_digest`; its first five
    /// words hold the input on entry and the result on return. Exactly two
    /// compressions, no padding work.
    #[inline(always)]
    pub fn chain(&self, scratch: &mut MessageBlock) -> HashState {
        let t = self.backend.compress(&self.inner, scratch);
        scratch.set_digest(&t);
        let u = self.backend.compress(&self.outer, scratch);
        scratch.set_digest(&u);
        u
    }
}

impl fmt::Debug for HmacContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacContext")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::sha1::{Digest, Sha1};

    // Textbook two-pass HMAC, as a reference for the precomputed path.
    fn reference_hmac(key: &[u8], data: &[u8]) -> [u8; 20] {
        let mut key_block = [0u8; 64];
        if key.len() > 64 {
            let digest = Sha1::digest(key);
            key_block[..20].copy_from_slice(&digest);
        } else {
            key_block[..key.len()].copy_from_slice(key);
        }

        let mut ipad = [0x36u8; 64];
        let mut opad = [0x5cu8; 64];
        for i in 0..64 {
            ipad[i] ^= key_block[i];
            opad[i] ^= key_block[i];
        }

        let mut inner = Sha1::new();
        inner.update(ipad);
        inner.update(data);
        let inner_hash = inner.finalize();

        let mut outer = Sha1::new();
        outer.update(opad);
        outer.update(inner_hash);
        let mut out = [0u8; 20];
        out.copy_from_slice(&outer.finalize());
        out
    }

    #[test]
    fn rfc2202_case_2() {
        let ctx = HmacContext::with_backend(b"Jefe", Backend::Portable);
        let mac = ctx.mac_single_block(b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(mac.to_bytes()),
            "effcdf6ae5eb2fa2d27416d5f184df9c259a7c79"
        );
    }

    #[test]
    fn long_key_is_hashed_first() {
        // RFC 2202 case 6: 80-byte key of 0xaa.
        let ctx = HmacContext::with_backend(&[0xaa; 80], Backend::Portable);
        let mac = ctx.mac_single_block(b"Test Using Larger Than Block-Size Key - Hash Key First");
        assert_eq!(
            hex::encode(mac.to_bytes()),
            "aa4ae5e15272d00e95705637ce8a3b55ed402112"
        );
    }

    #[test]
    fn matches_reference_across_key_lengths() {
        let msg = b"salt\x00\x00\x00\x01";
        for len in [0usize, 1, 20, 63, 64, 65, 128] {
            let key: Vec<u8> = (0..len as u8).collect();
            let ctx = HmacContext::with_backend(&key, Backend::Portable);
            assert_eq!(
                ctx.mac_single_block(msg).to_bytes(),
                reference_hmac(&key, msg),
                "key length {len}"
            );
        }
    }

    #[test]
    fn chain_equals_mac_of_previous_output() {
        let ctx = HmacContext::with_backend(b"password", Backend::Portable);
        let u1 = ctx.mac_single_block(b"salt\x00\x00\x00\x01");
        let mut scratch = MessageBlock::for_digest(&u1);
        let u2 = ctx.chain(&mut scratch);
        assert_eq!(u2, ctx.mac_single_block(&u1.to_bytes()));
        assert_eq!(scratch, MessageBlock::for_digest(&u2));
    }

    #[test]
    #[should_panic(expected = "HMAC fast path")]
    fn oversize_message_panics() {
        HmacContext::with_backend(b"k", Backend::Portable).mac_single_block(&[0u8; 56]);
    }

    #[test]
    fn debug_does_not_leak_state() {
        let ctx = HmacContext::with_backend(b"secret", Backend::Portable);
        let shown = format!("{ctx:?}");
        assert!(!shown.contains("inner"));
    }
}
