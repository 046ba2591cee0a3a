//! Data models for finance records and configuration.

pub mod config;
pub mod record;
