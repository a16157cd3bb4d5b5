//! # alm-schema
//!
//! JSON Schema generation, validation, and registry for almfx.
//!
//! This crate provides:
//! - `SchemaRegistry`: central store of the fixture record and report schemas
//! - Compiled validators for per-line checks while writing or verifying a fixture
//! - Schema export for external tooling (`almfx schema` command)
//!
//! ## Architecture
//!
//! Record and report types are defined in `alm-core` with `#[derive(JsonSchema)]`.
//! This crate imports those types and provides the registry, validation, and export layer.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::{CompiledSchema, SchemaRegistry};
