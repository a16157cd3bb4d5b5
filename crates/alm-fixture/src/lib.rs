//! # alm-fixture
//!
//! Builds and checks the almanac regression fixture.
//!
//! - [`enumerate`]: every candidate sample in a year range, in file order
//! - [`normalize`]: engine snapshot to canonical [`Record`](alm_core::record::Record)
//! - [`writer`]: one JSON line per record, streamed
//! - [`pipeline`]: the generation driver and single-sample lookup
//! - [`verify`]: property checks over a finished fixture file
//! - [`compare`]: section-by-section diff of two fixture files

pub mod compare;
pub mod enumerate;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod verify;
pub mod writer;

pub use compare::{CompareOptions, compare};
pub use error::FixtureError;
pub use normalize::normalize;
pub use pipeline::{GenerateOptions, NoProgress, ProgressObserver, generate, sample};
pub use verify::{VerifyOptions, verify};
pub use writer::FixtureWriter;
