// Kumi - Build Configuration Assembler
// Library surface shared by the binary and the integration tests.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod utils;
