// ============================================================================
// src/lib.rs – fastpbkdf2: PBKDF2-HMAC-SHA1 at two compressions per iteration
// ============================================================================
//! PBKDF2-HMAC-SHA1 (RFC 8018) that absorbs the HMAC key block once per
//! derivation and then spends exactly two SHA-1 compressions per iteration.
//!
//! ```
//! let dk = fastpbkdf2::derive_key(b"password", b"salt", 4096, 20).unwrap();
//! assert_eq!(hex::encode(&dk[..]), "4b007901b765489abead49d926f721d065a429c1");
//! ```
//!
//! Salts are limited to [`MAX_SALT_LEN`] bytes so that `salt || INT(i)`
//! always fits one SHA-1 block.

pub mod error;
pub mod hmac;
pub mod pbkdf2;
pub mod sha1;

pub use error::{KdfError, Result};
pub use hmac::HmacContext;
pub use pbkdf2::{derive_block, derive_key, derive_key_into, Pbkdf2, MAX_KEY_LEN, MAX_SALT_LEN};
pub use sha1::{Backend, Compress, HashState, MessageBlock};
