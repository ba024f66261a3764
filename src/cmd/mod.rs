// ============================================================================
// src/cmd/mod.rs – command subsystem root
// ============================================================================
pub mod backends; // fastpbkdf2 backends
pub mod derive; // fastpbkdf2 derive
pub mod salt; // fastpbkdf2 salt
pub mod selftest; // fastpbkdf2 selftest
