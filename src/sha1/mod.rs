// ============================================================================
// src/sha1/mod.rs – SHA-1 compression backends and runtime selection
// ============================================================================

pub mod block;
pub mod portable;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub mod x86;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub use block::{HashState, MessageBlock, BLOCK_LEN, DIGEST_LEN};

/// A SHA-1 compression step: (160-bit state, 512-bit block) -> 160-bit state.
///
/// Every implementation must be bit-identical to `portable::compress`.
pub trait Compress {
    fn compress(&self, state: &HashState, block: &MessageBlock) -> HashState;
}

/// Available compression implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// Pure Rust reference rounds.
    Portable,
    /// Intel SHA extensions (x86 / x86_64).
    ShaNi,
}

impl Backend {
    /// Pick the fastest backend the running CPU supports.
    pub fn detect() -> Self {
        let chosen = if Backend::ShaNi.is_available() {
            Backend::ShaNi
        } else {
            Backend::Portable
        };
        debug!(backend = %chosen, "selected sha1 compression backend");
        chosen
    }

    pub fn is_available(self) -> bool {
        match self {
            Backend::Portable => true,
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::ShaNi => x86::is_supported(),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            Backend::ShaNi => false,
        }
    }

    /// All backends usable on this machine, portable first.
    pub fn available() -> Vec<Backend> {
        [Backend::Portable, Backend::ShaNi]
            .into_iter()
            .filter(|b| b.is_available())
            .collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Portable => "portable",
            Backend::ShaNi => "sha-ni",
        }
    }
}

impl Compress for Backend {
    #[inline(always)]
    fn compress(&self, state: &HashState, block: &MessageBlock) -> HashState {
        match self {
            Backend::Portable => portable::compress(state, block),
            #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
            Backend::ShaNi => x86::compress(state, block),
            #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
            Backend::ShaNi => panic!("SHA-NI backend is not compiled for this target"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portable" | "generic" => Ok(Backend::Portable),
            "sha-ni" | "shani" | "sha_ni" => Ok(Backend::ShaNi),
            other => Err(format!("unknown sha1 backend '{other}'")),
        }
    }
}

/// Full SHA-1 digest of an arbitrary-length message.
///
/// Only needed for the HMAC hash-before-pad rule on long passwords.
pub fn sha1_digest(data: &[u8]) -> [u8; DIGEST_LEN] {
    use ::sha1::{Digest, Sha1};
    let mut out = [0u8; DIGEST_LEN];
    out.copy_from_slice(&Sha1::digest(data));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portable_is_always_available() {
        assert!(Backend::available().contains(&Backend::Portable));
        assert!(Backend::detect().is_available());
    }

    #[test]
    fn backend_names_round_trip_through_from_str() {
        for b in [Backend::Portable, Backend::ShaNi] {
            assert_eq!(b.name().parse::<Backend>(), Ok(b));
        }
        assert!("md5".parse::<Backend>().is_err());
    }

    #[test]
    fn sha1_digest_known_answer() {
        assert_eq!(
            hex::encode(sha1_digest(b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn every_available_backend_matches_portable() {
        let block = block::pad_block(b"backend equivalence", 0);
        let want = portable::compress(&HashState::INIT, &block);
        for b in Backend::available() {
            assert_eq!(b.compress(&HashState::INIT, &block), want, "{b}");
        }
    }
}
