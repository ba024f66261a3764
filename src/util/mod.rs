// ============================================================================
// src/util/mod.rs – helpers for the command-line front end
// ============================================================================

pub mod atomic;
