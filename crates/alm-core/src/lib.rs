//! # alm-core
//!
//! Core types for the almanac fixture generator.
//!
//! This crate provides the foundational types shared across all crates:
//! - Configuration modes (`duty` / `noduty`) and other small enums
//! - `SampleKey`, `SampleTime`, and `YearRange` describing a unit of work
//! - `OracleSnapshot`, the raw attribute bag returned by the calendrical engine
//! - `Record`, the canonical fixture line schema
//! - Report types returned as JSON by `almfx` commands
//! - Cross-cutting error types

pub mod enums;
pub mod errors;
pub mod record;
pub mod responses;
pub mod sample;
pub mod snapshot;
