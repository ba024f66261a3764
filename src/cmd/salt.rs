// ============================================================================
// src/cmd/salt.rs – random salt generation
// ============================================================================

use crate::config::Config;
use crate::ui::UX;
use anyhow::{bail, Result};
use fastpbkdf2::MAX_SALT_LEN;
use rand::RngCore;

pub fn random_salt(len: usize) -> Result<Vec<u8>> {
    if len == 0 || len > MAX_SALT_LEN {
        bail!("salt length must be between 1 and {MAX_SALT_LEN} bytes, got {len}");
    }
    let mut salt = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut salt);
    Ok(salt)
}

pub fn run_salt(ui: &UX, cfg: &Config, length: Option<usize>) -> Result<()> {
    let len = length.unwrap_or(cfg.derive.salt_len);
    if len < 8 {
        ui.warn("Salts under 8 bytes are below the RFC 8018 recommendation.");
    }
    let salt = random_salt(len)?;
    println!("{}", hex::encode(salt));
    Ok(())
}
