// ============================================================================
// src/cmd/backends.rs – report compression backends usable on this CPU
// ============================================================================

use anyhow::Result;
use fastpbkdf2::Backend;

pub fn run_backends() -> Result<()> {
    let detected = Backend::detect();
    for b in [Backend::Portable, Backend::ShaNi] {
        let status = if !b.is_available() {
            "unavailable"
        } else if b == detected {
            "available (selected)"
        } else {
            "available"
        };
        println!("{:<10} {}", b.name(), status);
    }
    Ok(())
}
