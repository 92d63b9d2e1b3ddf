//! Differential benchmark harness.
//!
//! Every codec under test implements [`Codec`]. A [`Driver`] loads a fixture, verifies the
//! codec against it and only then measures it, recording into a [`SuiteBuilder`].

pub mod alloc;
pub mod codec;
mod driver;
mod error;
pub mod measure;
pub mod ports;
pub mod results;

pub use codec::{Codec, Interfaces};
pub use driver::{Driver, Idle, Loaded, Reported, Verified};
pub use error::{Error, Result, VerificationError};
pub use measure::{MeasureConfig, Measurement};
pub use results::{BenchmarkResult, BenchmarkSuite, Comparison, Phase, SuiteBuilder};

pub type Root = [u8; 32];
