// src/dev/mod.rs
// Helpers shared by tests and the dev binaries.
pub mod generator;
pub mod reference;
