//! Core domain types and logic.

pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod ohlcv;
pub mod runner;
pub mod sample_data;
pub mod sensitivity;
pub mod signal;
pub mod strategy;
