//! Attendance and Time-Accounting Engine
//!
//! This crate turns raw clock punches into normalized work-hour computations,
//! overtime premiums and a running bank of hours, and computes vacation
//! entitlements under the Brazilian CLT acquisitive/concessive period rules.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
