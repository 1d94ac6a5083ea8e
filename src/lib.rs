//! Unlock-Stress Library
//!
//! Price-impact stress simulator for scheduled token unlock sell-offs

pub mod config;
pub mod model;
pub mod types;
