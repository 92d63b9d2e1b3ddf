//! Benchmark result records, their aggregation per library and the on-disk results files.

use std::{
    collections::BTreeMap,
    fmt::Display,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use storage::FixtureId;

use crate::{Error, Result, measure::Measurement, ports::clock::Clock};

/// A measured operation, named as in the results files.
///
/// There is no `UnmarshalStreamBuffer`: no codec here decodes from a caller-owned buffer in a
/// way that differs from `Unmarshal`, so results files never carry that column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Unmarshal,
    UnmarshalReader,
    Marshal,
    MarshalWriter,
    MarshalStreamBuffer,
    HashTreeRoot,
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Unmarshal,
        Phase::UnmarshalReader,
        Phase::Marshal,
        Phase::MarshalWriter,
        Phase::MarshalStreamBuffer,
        Phase::HashTreeRoot,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unmarshal => "Unmarshal",
            Self::UnmarshalReader => "UnmarshalReader",
            Self::Marshal => "Marshal",
            Self::MarshalWriter => "MarshalWriter",
            Self::MarshalStreamBuffer => "MarshalStreamBuffer",
            Self::HashTreeRoot => "HashTreeRoot",
        }
    }

    /// Result name of this phase run against `fixture`, e.g. `BlockMainnet_Unmarshal`.
    pub fn benchmark_name(&self, fixture: FixtureId) -> String {
        format!(
            "{}{}_{}",
            fixture.kind.title(),
            fixture.preset.title(),
            self.as_str()
        )
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub name: String,
    pub iterations: u64,
    pub ns_per_op: f64,
    pub bytes_per_op: u64,
    pub allocs_per_op: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSuite {
    pub library: String,
    pub timestamp: DateTime<Utc>,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkSuite {
    pub fn file_name(library: &str) -> String {
        format!("{library}.json")
    }

    /// Writes the suite as indented JSON, replacing `path` atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let json = serde_json::to_vec_pretty(self).map_err(|e| io_err(e.into()))?;

        let mut staged = tempfile::NamedTempFile::new_in(&dir).map_err(io_err)?;
        staged
            .write_all(&json)
            .and_then(|()| staged.flush())
            .map_err(io_err)?;
        staged.persist(path).map_err(|e| io_err(e.error))?;

        tracing::info!(
            "wrote {} results for {} to {}",
            self.results.len(),
            self.library,
            path.display()
        );

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let json = std::fs::read(path).map_err(io_err)?;
        serde_json::from_slice(&json).map_err(|e| io_err(e.into()))
    }

    pub fn result(&self, name: &str) -> Option<&BenchmarkResult> {
        self.results.iter().find(|result| result.name == name)
    }
}

/// Collects results for one library. Finalizing consumes the builder, so a finalized suite can
/// no longer grow.
#[derive(Debug, Default)]
pub struct SuiteBuilder {
    results: Vec<BenchmarkResult>,
}

impl SuiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        name: impl Into<String>,
        iterations: u64,
        ns_per_op: f64,
        bytes_per_op: u64,
        allocs_per_op: u64,
    ) {
        self.results.push(BenchmarkResult {
            name: name.into(),
            iterations,
            ns_per_op,
            bytes_per_op,
            allocs_per_op,
        });
    }

    pub fn record_measurement(&mut self, name: impl Into<String>, measurement: &Measurement) {
        self.record(
            name,
            measurement.iterations,
            measurement.ns_per_op(),
            measurement.bytes_per_op(),
            measurement.allocs_per_op(),
        );
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn finalize(self, library: impl Into<String>, clock: &impl Clock) -> BenchmarkSuite {
        BenchmarkSuite {
            library: library.into(),
            timestamp: clock.now(),
            results: self.results,
        }
    }
}

/// ns/op of every benchmark name across several suites.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    libraries: Vec<String>,
    rows: BTreeMap<String, Vec<Option<f64>>>,
}

impl Comparison {
    pub fn new(suites: &[BenchmarkSuite]) -> Self {
        let libraries = suites.iter().map(|suite| suite.library.clone()).collect_vec();

        let rows = suites
            .iter()
            .flat_map(|suite| suite.results.iter().map(|result| result.name.clone()))
            .unique()
            .map(|name| {
                let cells = suites
                    .iter()
                    .map(|suite| suite.result(&name).map(|result| result.ns_per_op))
                    .collect_vec();
                (name, cells)
            })
            .collect();

        Self { libraries, rows }
    }

    pub fn libraries(&self) -> &[String] {
        &self.libraries
    }

    pub fn ns_per_op(&self, name: &str, library: &str) -> Option<f64> {
        let column = self.libraries.iter().position(|lib| lib == library)?;
        self.rows.get(name)?.get(column).copied().flatten()
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name_width = self
            .rows
            .keys()
            .map(String::len)
            .chain(std::iter::once("benchmark".len()))
            .max()
            .unwrap_or_default();

        let cell_width = self
            .libraries
            .iter()
            .map(String::len)
            .chain(std::iter::once(14))
            .max()
            .unwrap_or_default();

        let header = self
            .libraries
            .iter()
            .map(|lib| format!("{lib:>cell_width$}"))
            .join("  ");
        writeln!(f, "{:<name_width$}  {header}", "benchmark")?;

        for (name, cells) in &self.rows {
            let cells = cells
                .iter()
                .map(|cell| match cell {
                    Some(ns) => format!("{:>cell_width$}", format!("{ns:.1}")),
                    None => format!("{:>cell_width$}", "-"),
                })
                .join("  ");
            writeln!(f, "{name:<name_width$}  {cells}")?;
        }

        Ok(())
    }
}
