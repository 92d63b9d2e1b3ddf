use std::{collections::HashMap, path::PathBuf, time::Duration};

use clap::{Args, Parser, Subcommand, ValueEnum};
use harness::MeasureConfig;
use presets::PresetName;
use serde::{Deserialize, Serialize};
use storage::ObjectKind;

use crate::errors::{Error, Result};

const ENV_PREFIX: &str = "SSZ_BENCH";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Generate(GenerateConfig),
    Run(RunConfig),
    Compare(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    /// Directory receiving the fixtures, metadata and preset files.
    pub output: PathBuf,
    pub generator: generator::Config,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub fixtures: PathBuf,
    pub results: PathBuf,
    pub libraries: Vec<Library>,
    pub presets: Vec<PresetName>,
    pub kinds: Vec<ObjectKind>,
    pub measure: MeasureConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    Dynamic,
    Lighthouse,
    SszRs,
}

impl Library {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dynamic => dynamic_codec::NAME,
            Self::Lighthouse => lighthouse_codec::NAME,
            Self::SszRs => ssz_rs_codec::NAME,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LibrarySelection {
    Dynamic,
    Lighthouse,
    #[serde(rename = "ssz_rs")]
    #[value(name = "ssz_rs")]
    SszRs,
    All,
}

impl LibrarySelection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Dynamic => "dynamic",
            Self::Lighthouse => "lighthouse",
            Self::SszRs => "ssz_rs",
            Self::All => "all",
        }
    }

    fn libraries(&self) -> Vec<Library> {
        match self {
            Self::Dynamic => vec![Library::Dynamic],
            Self::Lighthouse => vec![Library::Lighthouse],
            Self::SszRs => vec![Library::SszRs],
            Self::All => vec![Library::Dynamic, Library::Lighthouse, Library::SszRs],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PresetSelection {
    Mainnet,
    Minimal,
    All,
}

impl PresetSelection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Minimal => "minimal",
            Self::All => "all",
        }
    }

    fn presets(&self) -> Vec<PresetName> {
        match self {
            Self::Mainnet => vec![PresetName::Mainnet],
            Self::Minimal => vec![PresetName::Minimal],
            Self::All => PresetName::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum KindSelection {
    Block,
    State,
    All,
}

impl KindSelection {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::State => "state",
            Self::All => "all",
        }
    }

    fn kinds(&self) -> Vec<ObjectKind> {
        match self {
            Self::Block => vec![ObjectKind::Block],
            Self::State => vec![ObjectKind::State],
            Self::All => ObjectKind::ALL.to_vec(),
        }
    }
}

/// Everything that can come from the config file or the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Settings {
    output: PathBuf,
    generate: generator::Config,
    run: RunSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output: PathBuf::from("."),
            generate: generator::Config::default(),
            run: RunSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct RunSettings {
    fixtures: PathBuf,
    results: PathBuf,
    library: LibrarySelection,
    preset: PresetSelection,
    kind: KindSelection,
    #[serde(with = "harness::measure::human_readable_duration")]
    target_time: Duration,
    min_iterations: u64,
    max_iterations: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        let measure = MeasureConfig::default();
        Self {
            fixtures: PathBuf::from("."),
            results: PathBuf::from("results"),
            library: LibrarySelection::All,
            preset: PresetSelection::All,
            kind: KindSelection::All,
            target_time: measure.target_time,
            min_iterations: measure.min_iterations,
            max_iterations: measure.max_iterations,
        }
    }
}

impl RunSettings {
    fn into_config(self) -> Result<RunConfig> {
        if self.min_iterations > self.max_iterations {
            return Err(Error::Config(format!(
                "min iterations ({}) exceed max iterations ({})",
                self.min_iterations, self.max_iterations
            )));
        }

        Ok(RunConfig {
            fixtures: self.fixtures,
            results: self.results,
            libraries: self.library.libraries(),
            presets: self.preset.presets(),
            kinds: self.kind.kinds(),
            measure: MeasureConfig {
                target_time: self.target_time,
                min_iterations: self.min_iterations,
                max_iterations: self.max_iterations,
            },
        })
    }
}

#[derive(Parser)]
#[command(
    name = "ssz-bench",
    version,
    about,
    propagate_version = true,
    arg_required_else_help(true)
)]
struct Cli {
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        help = "TOML file layered below SSZ_BENCH__* variables and flags"
    )]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Generate block and state fixtures for every preset.
    Generate(GenerateArgs),
    /// Verify each codec against the fixtures, then benchmark it.
    Run(RunArgs),
    /// Print ns/op of several results files side by side.
    Compare {
        #[arg(required = true, value_name = "FILES")]
        files: Vec<PathBuf>,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    #[arg(short = 'v', long, help = "Number of validators in the state")]
    validators: Option<usize>,
    #[arg(short = 't', long, help = "Number of execution payload transactions")]
    transactions: Option<usize>,
    #[arg(long, help = "Minimum transaction size in bytes")]
    tx_min_size: Option<usize>,
    #[arg(long, help = "Maximum transaction size in bytes")]
    tx_max_size: Option<usize>,
    #[arg(long)]
    attestations: Option<usize>,
    #[arg(long)]
    deposits: Option<usize>,
    #[arg(long)]
    proposer_slashings: Option<usize>,
    #[arg(long)]
    attester_slashings: Option<usize>,
    #[arg(long)]
    voluntary_exits: Option<usize>,
    #[arg(long)]
    bls_changes: Option<usize>,
    #[arg(long)]
    withdrawals: Option<usize>,
    #[arg(long)]
    blob_commitments: Option<usize>,
    #[arg(long)]
    slot: Option<u64>,
    #[arg(short = 'o', long, help = "Output directory")]
    output: Option<PathBuf>,
    #[arg(long, help = "Random seed, 0 for a non-deterministic run")]
    seed: Option<u64>,
}

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

fn set(builder: Builder, key: &str, value: Option<usize>) -> Result<Builder> {
    Ok(builder.set_override_option(key, value.map(|v| v as u64))?)
}

impl GenerateArgs {
    fn apply(self, builder: Builder) -> Result<Builder> {
        let builder = set(builder, "generate.validators", self.validators)?;
        let builder = set(builder, "generate.transactions", self.transactions)?;
        let builder = set(builder, "generate.tx_min_size", self.tx_min_size)?;
        let builder = set(builder, "generate.tx_max_size", self.tx_max_size)?;
        let builder = set(builder, "generate.attestations", self.attestations)?;
        let builder = set(builder, "generate.deposits", self.deposits)?;
        let builder = set(builder, "generate.proposer_slashings", self.proposer_slashings)?;
        let builder = set(builder, "generate.attester_slashings", self.attester_slashings)?;
        let builder = set(builder, "generate.voluntary_exits", self.voluntary_exits)?;
        let builder = set(builder, "generate.bls_changes", self.bls_changes)?;
        let builder = set(builder, "generate.withdrawals", self.withdrawals)?;
        let builder = set(builder, "generate.blob_commitments", self.blob_commitments)?;

        Ok(builder
            .set_override_option("generate.slot", self.slot)?
            .set_override_option("generate.seed", self.seed)?
            .set_override_option("output", self.output.map(|p| p.display().to_string()))?)
    }
}

#[derive(Args, Default)]
struct RunArgs {
    #[arg(long, help = "Directory holding the generated fixtures")]
    fixtures: Option<PathBuf>,
    #[arg(long, help = "Directory receiving one results file per library")]
    results: Option<PathBuf>,
    #[arg(long, value_enum)]
    library: Option<LibrarySelection>,
    #[arg(long, value_enum)]
    preset: Option<PresetSelection>,
    #[arg(long, value_enum)]
    kind: Option<KindSelection>,
    #[arg(long, value_parser = humantime::parse_duration, help = "Minimum duration of a measured batch, e.g. 500ms")]
    target_time: Option<Duration>,
    #[arg(long)]
    min_iterations: Option<u64>,
    #[arg(long)]
    max_iterations: Option<u64>,
}

impl RunArgs {
    fn apply(self, builder: Builder) -> Result<Builder> {
        Ok(builder
            .set_override_option("run.fixtures", self.fixtures.map(|p| p.display().to_string()))?
            .set_override_option("run.results", self.results.map(|p| p.display().to_string()))?
            .set_override_option("run.library", self.library.map(|l| l.as_str()))?
            .set_override_option("run.preset", self.preset.map(|p| p.as_str()))?
            .set_override_option("run.kind", self.kind.map(|k| k.as_str()))?
            .set_override_option(
                "run.target_time",
                self.target_time
                    .map(|d| humantime::format_duration(d).to_string()),
            )?
            .set_override_option("run.min_iterations", self.min_iterations)?
            .set_override_option("run.max_iterations", self.max_iterations)?)
    }
}

pub fn parse() -> Result<Command> {
    load(Cli::parse(), None)
}

/// Layers, lowest first: built-in defaults, the `--config` file, `SSZ_BENCH__*` variables (taken
/// from `env` when given, the process environment otherwise), command line flags.
fn load(cli: Cli, env: Option<HashMap<String, String>>) -> Result<Command> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&Settings::default())?);

    if let Some(path) = &cli.config {
        builder = builder.add_source(config::File::from(path.as_path()));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    match cli.command {
        CliCommand::Generate(args) => {
            let settings: Settings = args.apply(builder)?.build()?.try_deserialize()?;
            settings.generate.validate()?;

            Ok(Command::Generate(GenerateConfig {
                output: settings.output,
                generator: settings.generate,
            }))
        }
        CliCommand::Run(args) => {
            let settings: Settings = args.apply(builder)?.build()?.try_deserialize()?;
            Ok(Command::Run(settings.run.into_config()?))
        }
        CliCommand::Compare { files } => Ok(Command::Compare(files)),
    }
}
