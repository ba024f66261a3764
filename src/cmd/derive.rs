// ============================================================================
// src/cmd/derive.rs – derive a key and emit it as hex, raw bytes or JSON
// ============================================================================

use crate::config::{BackendChoice, Config, OutputFormat};
use crate::ui::UX;
use crate::util::atomic::atomic_write_key;
use anyhow::{anyhow, bail, Context, Result};
use dialoguer::Password;
use fastpbkdf2::{Pbkdf2, MAX_SALT_LEN};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use zeroize::Zeroizing;

pub const PASSWORD_ENV: &str = "FASTPBKDF2_PASSWORD";

#[derive(Debug, Clone, clap::Args)]
pub struct DeriveArgs {
    /// Salt as literal text
    #[arg(long, conflicts_with = "salt_hex", required_unless_present = "salt_hex")]
    pub salt: Option<String>,
    /// Salt as hex
    #[arg(long)]
    pub salt_hex: Option<String>,
    /// Iteration count (config default: 4096)
    #[arg(short, long)]
    pub iterations: Option<u32>,
    /// Derived key length in bytes (config default: 32)
    #[arg(short, long)]
    pub length: Option<usize>,
    /// Compression backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendChoice>,
    /// Output encoding
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
    /// Write the raw key to this file (0400) instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Overwrite an existing --out file
    #[arg(long)]
    pub force: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    key: &'a str,
    iterations: u32,
    key_len: usize,
    backend: &'a str,
}

pub fn run_derive(ui: &UX, cfg: &Config, args: &DeriveArgs) -> Result<()> {
    let iterations = args.iterations.unwrap_or(cfg.derive.iterations);
    let key_len = args.length.unwrap_or(cfg.derive.key_len);
    let backend = args.backend.unwrap_or(cfg.derive.backend).resolve();
    let format = args.format.unwrap_or(cfg.output.format);

    let salt = parse_salt(args)?;
    if salt.len() > MAX_SALT_LEN {
        bail!(
            "salt is {} bytes; this tool supports at most {} (single-block fast path)",
            salt.len(),
            MAX_SALT_LEN
        );
    }
    if salt.len() < 8 {
        ui.warn("Salt shorter than 8 bytes; RFC 8018 recommends at least 8 random bytes.");
    }

    let password = read_password(args.password_stdin)?;

    let kdf = Pbkdf2::with_backend(backend);
    if kdf.backend() != backend {
        ui.warn(&format!(
            "Backend {} unavailable on this CPU; using {}.",
            backend,
            kdf.backend()
        ));
    }

    let started = Instant::now();
    let dk = kdf
        .derive_key(password.as_bytes(), &salt, iterations, key_len)
        .context("derive key")?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        backend = %kdf.backend(),
        "derivation finished"
    );

    if let Some(path) = &args.out {
        atomic_write_key(path, &dk, args.force)?;
        ui.success(&format!("Derived {} bytes -> {}", key_len, path.display()));
        return Ok(());
    }

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Hex => {
            let encoded = Zeroizing::new(hex::encode(&dk[..]));
            writeln!(stdout, "{}", encoded.as_str())?;
        }
        OutputFormat::Raw => stdout.write_all(&dk)?,
        OutputFormat::Json => {
            let encoded = Zeroizing::new(hex::encode(&dk[..]));
            let body = JsonOutput {
                key: &encoded,
                iterations,
                key_len,
                backend: kdf.backend().name(),
            };
            let text = Zeroizing::new(serde_json::to_string_pretty(&body)?);
            writeln!(stdout, "{}", text.as_str())?;
        }
    }
    stdout.flush()?;
    Ok(())
}

fn parse_salt(args: &DeriveArgs) -> Result<Vec<u8>> {
    match (&args.salt, &args.salt_hex) {
        (Some(text), None) => Ok(text.as_bytes().to_vec()),
        (None, Some(h)) => {
            let cleaned: String = h.chars().filter(|c| !c.is_whitespace()).collect();
            hex::decode(&cleaned).context("decode --salt-hex")
        }
        _ => Err(anyhow!("exactly one of --salt or --salt-hex is required")),
    }
}

fn read_password(from_stdin: bool) -> Result<Zeroizing<String>> {
    if from_stdin {
        let mut line = Zeroizing::new(String::new());
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read password from stdin")?;
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        return Ok(line);
    }

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(Zeroizing::new(pw));
    }

    let pw = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()
        .context("read password input")?;
    Ok(Zeroizing::new(pw))
}
