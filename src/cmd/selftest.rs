// ============================================================================
// src/cmd/selftest.rs – known-answer and backend agreement checks
// ============================================================================

use crate::ui::UX;
use anyhow::{bail, Result};
use fastpbkdf2::sha1::portable;
use fastpbkdf2::{Backend, Compress, HashState, MessageBlock, Pbkdf2};
use rand::Rng;
use tracing::debug;

struct Vector {
    password: &'static [u8],
    salt: &'static [u8],
    iterations: u32,
    expected: &'static str,
}

// RFC 6070 (the 16777216-iteration case is left to the ignored test).
const VECTORS: &[Vector] = &[
    Vector {
        password: b"password",
        salt: b"salt",
        iterations: 1,
        expected: "0c60c80f961f0e71f3a9b524af6012062fe037a6",
    },
    Vector {
        password: b"password",
        salt: b"salt",
        iterations: 2,
        expected: "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957",
    },
    Vector {
        password: b"password",
        salt: b"salt",
        iterations: 4096,
        expected: "4b007901b765489abead49d926f721d065a429c1",
    },
    Vector {
        password: b"passwordPASSWORDpassword",
        salt: b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
        iterations: 4096,
        expected: "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038",
    },
    Vector {
        password: b"pass\0word",
        salt: b"sa\0lt",
        iterations: 4096,
        expected: "56fa6aa75548099dcc37d7f03425e0c3",
    },
];

const EQUIVALENCE_SAMPLES: usize = 4096;

/// Returns the number of failed checks.
pub fn run_checks(ui: &UX) -> usize {
    let mut failures = 0;

    for backend in Backend::available() {
        let kdf = Pbkdf2::with_backend(backend);
        for (i, v) in VECTORS.iter().enumerate() {
            let len = v.expected.len() / 2;
            let got = match kdf.derive_key(v.password, v.salt, v.iterations, len) {
                Ok(dk) => hex::encode(&dk[..]),
                Err(e) => format!("error: {e}"),
            };
            if got == v.expected {
                debug!(%backend, vector = i + 1, "known answer ok");
            } else {
                ui.error(&format!(
                    "{backend}: RFC 6070 vector {} mismatch (got {got})",
                    i + 1
                ));
                failures += 1;
            }
        }
    }

    let mut rng = rand::thread_rng();
    for backend in Backend::available() {
        if backend == Backend::Portable {
            continue;
        }
        for _ in 0..EQUIVALENCE_SAMPLES {
            let state = HashState(rng.gen());
            let block = MessageBlock(rng.gen());
            if backend.compress(&state, &block) != portable::compress(&state, &block) {
                ui.error(&format!("{backend}: compression disagrees with portable"));
                failures += 1;
                break;
            }
        }
    }

    failures
}

pub fn run_selftest(ui: &UX) -> Result<()> {
    let available: Vec<&str> = Backend::available().iter().map(|b| b.name()).collect();
    ui.info(&format!("Testing backends: {}", available.join(", ")));

    let failures = run_checks(ui);
    if failures > 0 {
        bail!("self-test failed: {failures} check(s)");
    }
    ui.success("All known-answer and equivalence checks passed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selftest_passes() {
        assert_eq!(run_checks(&UX::new(true)), 0);
    }
}
