//! Utilities shared by the matchroom binaries and tests.

pub mod logger;
pub mod time;
