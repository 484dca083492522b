// Core domain layer
pub mod assembler;
pub mod interfaces;
pub mod models;
pub mod services;

pub use assembler::*;
pub use interfaces::*;
pub use models::*;
pub use services::*;
