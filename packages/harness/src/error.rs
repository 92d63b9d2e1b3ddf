use std::path::PathBuf;

use storage::Digest;

use crate::{Phase, codec};

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("hash tree root mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: Digest, actual: Digest },
    #[error(
        "re-encoded bytes differ from the fixture at offset {offset} (expected {expected_len} bytes, got {actual_len})"
    )]
    BytesMismatch {
        offset: usize,
        expected_len: usize,
        actual_len: usize,
    },
}

impl VerificationError {
    /// Compares `actual` against `expected`, reporting the first differing offset.
    pub fn check_bytes(expected: &[u8], actual: &[u8]) -> std::result::Result<(), Self> {
        if expected == actual {
            return Ok(());
        }

        let offset = expected
            .iter()
            .zip(actual)
            .position(|(a, b)| a != b)
            .unwrap_or_else(|| expected.len().min(actual.len()));

        Err(Self::BytesMismatch {
            offset,
            expected_len: expected.len(),
            actual_len: actual.len(),
        })
    }

    pub fn check_digest(expected: Digest, actual: Digest) -> std::result::Result<(), Self> {
        if expected != actual {
            return Err(Self::DigestMismatch { expected, actual });
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{library} failed during {phase}: {source}")]
    Codec {
        library: &'static str,
        phase: Phase,
        #[source]
        source: codec::Error,
    },
    #[error(transparent)]
    Storage(#[from] storage::Error),
    #[error("{library} failed verification of {fixture} during {phase}: {source}")]
    Verification {
        library: &'static str,
        fixture: storage::FixtureId,
        phase: Phase,
        #[source]
        source: VerificationError,
    },
}

impl From<presets::Error> for Error {
    fn from(error: presets::Error) -> Self {
        Self::Config(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
