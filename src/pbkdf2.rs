// ============================================================================
// src/pbkdf2.rs – PBKDF2-HMAC-SHA1 iteration engine and key assembly
// ============================================================================

use crate::error::{KdfError, Result};
use crate::hmac::HmacContext;
use crate::sha1::block::MAX_SINGLE_BLOCK_MSG;
use crate::sha1::{Backend, MessageBlock, DIGEST_LEN};
use tracing::{debug, trace};
use zeroize::{Zeroize, Zeroizing};

/// Longest salt for which `salt || INT(i)` still pads into one block.
pub const MAX_SALT_LEN: usize = MAX_SINGLE_BLOCK_MSG - 4;

/// RFC 8018 dkLen bound: (2^32 - 1) * hLen.
pub const MAX_KEY_LEN: u64 = (u32::MAX as u64) * DIGEST_LEN as u64;

/// PBKDF2-HMAC-SHA1 pinned to one compression backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2 {
    backend: Backend,
}

impl Default for Pbkdf2 {
    fn default() -> Self {
        Self::new()
    }
}

impl Pbkdf2 {
    /// Use the fastest backend the CPU supports.
    pub fn new() -> Self {
        Self {
            backend: Backend::detect(),
        }
    }

    /// Pin a backend. Unavailable backends fall back to portable.
    pub fn with_backend(backend: Backend) -> Self {
        let backend = if backend.is_available() {
            backend
        } else {
            debug!(requested = %backend, "backend unavailable, using portable");
            Backend::Portable
        };
        Self { backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Derive `key_len` bytes from `password` and `salt`.
    pub fn derive_key(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        key_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        check_params(salt, iterations, key_len)?;
        let mut dk = Zeroizing::new(vec![0u8; key_len]);
        self.fill(password, salt, iterations, &mut dk);
        Ok(dk)
    }

    /// Derive `out.len()` bytes straight into `out`.
    pub fn derive_key_into(
        &self,
        password: &[u8],
        salt: &[u8],
        iterations: u32,
        out: &mut [u8],
    ) -> Result<()> {
        check_params(salt, iterations, out.len())?;
        self.fill(password, salt, iterations, out);
        Ok(())
    }

    fn fill(&self, password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) {
        let ctx = HmacContext::with_backend(password, self.backend);
        let blocks = out.len().div_ceil(DIGEST_LEN);
        debug!(
            iterations,
            key_len = out.len(),
            blocks,
            backend = %self.backend,
            "deriving pbkdf2-hmac-sha1 key"
        );

        for (i, chunk) in out.chunks_mut(DIGEST_LEN).enumerate() {
            // Block indices are 1-based; check_params bounds them to u32.
            let index = (i + 1) as u32;
            let mut t = derive_block(&ctx, salt, index, iterations);
            chunk.copy_from_slice(&t[..chunk.len()]);
            t.zeroize();
            trace!(block = index, "block done");
        }
    }
}

/// Derive a key with the auto-detected backend.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    Pbkdf2::new().derive_key(password, salt, iterations, key_len)
}

/// Fill `out` with derived key bytes using the auto-detected backend.
pub fn derive_key_into(password: &[u8], salt: &[u8], iterations: u32, out: &mut [u8]) -> Result<()> {
    Pbkdf2::new().derive_key_into(password, salt, iterations, out)
}

/// Compute output block `T_index` (1-based) of PBKDF2-HMAC-SHA1.
///
/// Blocks share nothing but the read-only `ctx`, so callers may compute
/// them on separate threads. Panics if `salt` exceeds `MAX_SALT_LEN` or
/// `iterations` is zero.
pub fn derive_block(ctx: &HmacContext, salt: &[u8], index: u32, iterations: u32) -> [u8; DIGEST_LEN] {
    assert!(iterations >= 1, "iterations must be >= 1");
    assert!(
        salt.len() <= MAX_SALT_LEN,
        "salt of {} bytes exceeds single-block limit {MAX_SALT_LEN}",
        salt.len()
    );

    let mut msg = [0u8; MAX_SINGLE_BLOCK_MSG];
    let msg_len = salt.len() + 4;
    msg[..salt.len()].copy_from_slice(salt);
    msg[salt.len()..msg_len].copy_from_slice(&index.to_be_bytes());

    // U_1 = PRF(P, S || INT(i))
    let u1 = ctx.mac_single_block(&msg[..msg_len]);
    msg.zeroize();

    // U_n = PRF(P, U_{n-1}); T = U_1 ^ ... ^ U_c
    let mut acc = u1;
    let mut scratch = MessageBlock::for_digest(&u1);
    for _ in 1..iterations {
        let u = ctx.chain(&mut scratch);
        acc.xor_assign(&u);
    }

    let out = acc.to_bytes();
    acc.zeroize();
    scratch.zeroize();
    out
}

fn check_params(salt: &[u8], iterations: u32, key_len: usize) -> Result<()> {
    if iterations == 0 {
        return Err(KdfError::ZeroIterations);
    }
    if key_len == 0 {
        return Err(KdfError::ZeroKeyLength);
    }
    if salt.len() > MAX_SALT_LEN {
        return Err(KdfError::SaltTooLong {
            len: salt.len(),
            max: MAX_SALT_LEN,
        });
    }
    if key_len as u64 > MAX_KEY_LEN {
        return Err(KdfError::KeyTooLong {
            len: key_len,
            max: MAX_KEY_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_parameters() {
        let kdf = Pbkdf2::with_backend(Backend::Portable);
        assert_eq!(
            kdf.derive_key(b"p", b"s", 0, 20).unwrap_err(),
            KdfError::ZeroIterations
        );
        assert_eq!(
            kdf.derive_key(b"p", b"s", 1, 0).unwrap_err(),
            KdfError::ZeroKeyLength
        );
        assert_eq!(
            kdf.derive_key(b"p", &[0u8; 52], 1, 20).unwrap_err(),
            KdfError::SaltTooLong { len: 52, max: 51 }
        );
    }

    #[test]
    fn longest_salt_is_accepted() {
        let kdf = Pbkdf2::with_backend(Backend::Portable);
        assert!(kdf.derive_key(b"p", &[7u8; MAX_SALT_LEN], 2, 20).is_ok());
    }

    #[test]
    fn into_and_owned_forms_agree() {
        let kdf = Pbkdf2::with_backend(Backend::Portable);
        let owned = kdf.derive_key(b"password", b"salt", 3, 45).unwrap();
        let mut out = [0u8; 45];
        kdf.derive_key_into(b"password", b"salt", 3, &mut out).unwrap();
        assert_eq!(&owned[..], &out[..]);
    }

    #[test]
    fn blocks_are_independent() {
        let ctx = HmacContext::with_backend(b"password", Backend::Portable);
        let key = Pbkdf2::with_backend(Backend::Portable)
            .derive_key(b"password", b"salt", 5, 60)
            .unwrap();
        // Out of order on purpose.
        for index in [3u32, 1, 2] {
            let start = (index as usize - 1) * DIGEST_LEN;
            assert_eq!(
                &key[start..start + DIGEST_LEN],
                &derive_block(&ctx, b"salt", index, 5)[..]
            );
        }
    }

    #[test]
    fn rfc6070_single_iteration() {
        let dk = Pbkdf2::with_backend(Backend::Portable)
            .derive_key(b"password", b"salt", 1, 20)
            .unwrap();
        assert_eq!(hex::encode(&dk[..]), "0c60c80f961f0e71f3a9b524af6012062fe037a6");
    }
}
