//! Command implementations for the LPX CLI.

pub mod config;
pub mod simulate;

pub use config::ConfigCommand;
pub use simulate::SimulateArgs;
