//! Bank reference data.
//!
//! A static directory of supported banks and their contact details, loaded
//! once at startup and shared read-only across sessions.

mod directory;

pub use directory::{Bank, BankDirectory};
