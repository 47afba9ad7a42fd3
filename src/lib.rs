//! Hearth Ledger - Household budgeting and expense tracking core.
//!
//! This crate implements receipt item splitting with service-charge and tax
//! apportionment, plus the quest/XP progression engine that rewards household
//! engagement.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
