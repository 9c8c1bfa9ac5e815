//! CoinJoin-like Transaction Detector
//!

pub mod cli;
pub mod config;
pub mod detection;
pub mod errors;
pub mod processor;
pub mod types;
pub mod utils;
