//! Drives one codec through the verify-then-measure protocol against one fixture.
//!
//! `Idle -> Loaded -> Verified -> Reported`, with measurement only reachable from `Verified`.

use std::sync::Arc;

use storage::{Digest, Fixture, FixtureId};
use tracing::{debug, info};

use crate::{
    Error, Phase, Result, VerificationError,
    codec::{self, Codec},
    measure::{self, MeasureConfig, Measurement},
    results::SuiteBuilder,
};

#[derive(Debug)]
pub struct Idle;

#[derive(Debug)]
pub struct Loaded {
    fixture: Arc<Fixture>,
}

#[derive(Debug)]
pub struct Verified<O> {
    fixture: Arc<Fixture>,
    object: O,
}

#[derive(Debug)]
pub struct Reported {
    fixture: Arc<Fixture>,
    recorded: usize,
}

#[derive(Debug)]
pub struct Driver<C, S> {
    codec: C,
    state: S,
}

impl<C, S> Driver<C, S> {
    pub fn codec(&self) -> &C {
        &self.codec
    }
}

impl<C: Codec> Driver<C, Idle> {
    pub fn new(codec: C) -> Self {
        Self { codec, state: Idle }
    }

    pub fn load(self, fixture: Arc<Fixture>) -> Driver<C, Loaded> {
        debug!(
            "{} loaded {} ({} bytes)",
            self.codec.name(),
            fixture.id,
            fixture.bytes.len()
        );

        Driver {
            codec: self.codec,
            state: Loaded { fixture },
        }
    }
}

impl<C: Codec> Driver<C, Loaded> {
    pub fn fixture(&self) -> &Fixture {
        &self.state.fixture
    }

    /// Decodes the fixture, checks its root against the stored digest and checks that
    /// re-encoding reproduces the fixture bytes exactly.
    pub fn verify(self) -> Result<Driver<C, Verified<C::Object>>> {
        let fixture = self.state.fixture;
        let check = Checker {
            library: self.codec.name(),
            fixture: &fixture,
        };

        let object = self
            .codec
            .decode(&fixture.bytes)
            .map_err(|e| check.codec_error(Phase::Unmarshal, e))?;

        let root = self
            .codec
            .hash_tree_root(&object)
            .map_err(|e| check.codec_error(Phase::HashTreeRoot, e))?;
        check.digest(Phase::HashTreeRoot, root)?;

        let encoded = self
            .codec
            .encode(&object)
            .map_err(|e| check.codec_error(Phase::Marshal, e))?;
        check.bytes(Phase::Marshal, &encoded)?;

        info!("{} verified {}", self.codec.name(), fixture.id);

        Ok(Driver {
            codec: self.codec,
            state: Verified { fixture, object },
        })
    }
}

impl<C: Codec> Driver<C, Verified<C::Object>> {
    pub fn fixture(&self) -> &Fixture {
        &self.state.fixture
    }

    pub fn object(&self) -> &C::Object {
        &self.state.object
    }

    /// Times every phase the codec supports and records one result per phase.
    ///
    /// The output of the last iteration of each phase is checked against the digest or the
    /// fixture bytes before the result is recorded.
    pub fn measure(
        self,
        config: &MeasureConfig,
        suite: &mut SuiteBuilder,
    ) -> Result<Driver<C, Reported>> {
        let Driver { codec, state } = self;
        let Verified { fixture, object } = state;
        let check = Checker {
            library: codec.name(),
            fixture: &fixture,
        };
        let interfaces = codec.interfaces();
        let bytes = fixture.bytes.as_slice();
        let mut recorded = 0;
        let mut record = |phase: Phase, measurement: Measurement| {
            debug!(
                "{} {}: {} iterations, {:.1} ns/op, {} B/op, {} allocs/op",
                check.library,
                phase.benchmark_name(fixture.id),
                measurement.iterations,
                measurement.ns_per_op(),
                measurement.bytes_per_op(),
                measurement.allocs_per_op()
            );
            suite.record_measurement(phase.benchmark_name(fixture.id), &measurement);
            recorded += 1;
        };

        let (measurement, decoded) = measure::run(config, || codec.decode(bytes))
            .map_err(|e| check.codec_error(Phase::Unmarshal, e))?;
        check.decoded(&codec, Phase::Unmarshal, &decoded)?;
        drop(decoded);
        record(Phase::Unmarshal, measurement);

        if interfaces.reader {
            let (measurement, decoded) = measure::run(config, || {
                let mut reader = bytes;
                codec.decode_reader(&mut reader, bytes.len())
            })
            .map_err(|e| check.codec_error(Phase::UnmarshalReader, e))?;
            check.decoded(&codec, Phase::UnmarshalReader, &decoded)?;
            drop(decoded);
            record(Phase::UnmarshalReader, measurement);
        }

        let (measurement, encoded) = measure::run(config, || codec.encode(&object))
            .map_err(|e| check.codec_error(Phase::Marshal, e))?;
        check.bytes(Phase::Marshal, &encoded)?;
        record(Phase::Marshal, measurement);

        if interfaces.writer {
            let mut sink = Vec::with_capacity(bytes.len());
            let (measurement, ()) = measure::run(config, || {
                sink.clear();
                codec.encode_writer(&object, &mut sink)
            })
            .map_err(|e| check.codec_error(Phase::MarshalWriter, e))?;
            check.bytes(Phase::MarshalWriter, &sink)?;
            record(Phase::MarshalWriter, measurement);
        }

        if interfaces.buffer {
            let mut buffer = Vec::with_capacity(bytes.len());
            let (measurement, ()) = measure::run(config, || {
                buffer.clear();
                codec.encode_buffer(&object, &mut buffer)
            })
            .map_err(|e| check.codec_error(Phase::MarshalStreamBuffer, e))?;
            check.bytes(Phase::MarshalStreamBuffer, &buffer)?;
            record(Phase::MarshalStreamBuffer, measurement);
        }

        let (measurement, root) = measure::run(config, || codec.hash_tree_root(&object))
            .map_err(|e| check.codec_error(Phase::HashTreeRoot, e))?;
        check.digest(Phase::HashTreeRoot, root)?;
        record(Phase::HashTreeRoot, measurement);

        info!("{} measured {}: {recorded} phases", codec.name(), fixture.id);

        Ok(Driver {
            codec,
            state: Reported { fixture, recorded },
        })
    }
}

impl<C: Codec> Driver<C, Reported> {
    pub fn fixture(&self) -> &Fixture {
        &self.state.fixture
    }

    /// Number of results this driver added to the suite.
    pub fn recorded(&self) -> usize {
        self.state.recorded
    }

    /// Releases the fixture so the codec can drive the next one.
    pub fn into_idle(self) -> Driver<C, Idle> {
        Driver {
            codec: self.codec,
            state: Idle,
        }
    }
}

struct Checker<'a> {
    library: &'static str,
    fixture: &'a Fixture,
}

impl Checker<'_> {
    fn id(&self) -> FixtureId {
        self.fixture.id
    }

    fn codec_error(&self, phase: Phase, source: codec::Error) -> Error {
        Error::Codec {
            library: self.library,
            phase,
            source,
        }
    }

    fn verification_error(&self, phase: Phase, source: VerificationError) -> Error {
        Error::Verification {
            library: self.library,
            fixture: self.id(),
            phase,
            source,
        }
    }

    fn digest(&self, phase: Phase, root: crate::Root) -> Result<()> {
        VerificationError::check_digest(self.fixture.digest, Digest::new(root))
            .map_err(|e| self.verification_error(phase, e))
    }

    fn bytes(&self, phase: Phase, encoded: &[u8]) -> Result<()> {
        VerificationError::check_bytes(&self.fixture.bytes, encoded)
            .map_err(|e| self.verification_error(phase, e))
    }

    fn decoded<C: Codec>(&self, codec: &C, phase: Phase, object: &C::Object) -> Result<()> {
        let root = codec
            .hash_tree_root(object)
            .map_err(|e| self.codec_error(phase, e))?;
        self.digest(phase, root)
    }
}
