//! Journal library exports, shared by the binary and the integration tests.

pub mod cli;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;
