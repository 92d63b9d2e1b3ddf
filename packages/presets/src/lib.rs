//! Protocol presets of the Deneb fork.
//!
//! A [`Preset`] is the set of size bounds that parameterize every preset-dependent vector and list
//! of the beacon object graph. Presets are plain values: every encode, decode and hash call takes
//! the preset it should use as an argument.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown preset '{0}', expected one of: mainnet, minimal")]
    UnknownPreset(String),
    #[error("invalid {name} preset: {reason}")]
    InvalidPreset { name: PresetName, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetName {
    Mainnet,
    Minimal,
}

impl PresetName {
    pub const ALL: [PresetName; 2] = [PresetName::Mainnet, PresetName::Minimal];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Minimal => "minimal",
        }
    }

    /// Capitalized name used in benchmark result names, e.g. `Mainnet`.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Mainnet => "Mainnet",
            Self::Minimal => "Minimal",
        }
    }

    /// File name of the YAML rendition of this preset, e.g. `minimal-preset.yaml`.
    pub fn file_name(&self) -> String {
        format!("{}-preset.yaml", self.as_str())
    }
}

impl Display for PresetName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mainnet" => Ok(Self::Mainnet),
            "minimal" => Ok(Self::Minimal),
            other => Err(Error::UnknownPreset(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Preset {
    pub name: PresetName,
    pub slots_per_historical_root: usize,
    pub epochs_per_historical_vector: usize,
    pub epochs_per_slashings_vector: usize,
    pub sync_committee_size: usize,
    pub max_withdrawals_per_payload: usize,
    pub max_blob_commitments_per_block: usize,
    pub slots_per_epoch: usize,
    pub epochs_per_eth1_voting_period: usize,
}

impl Preset {
    pub const MAINNET: Preset = Preset {
        name: PresetName::Mainnet,
        slots_per_historical_root: 8192,
        epochs_per_historical_vector: 65536,
        epochs_per_slashings_vector: 8192,
        sync_committee_size: 512,
        max_withdrawals_per_payload: 16,
        max_blob_commitments_per_block: 4096,
        slots_per_epoch: 32,
        epochs_per_eth1_voting_period: 64,
    };

    pub const MINIMAL: Preset = Preset {
        name: PresetName::Minimal,
        slots_per_historical_root: 64,
        epochs_per_historical_vector: 64,
        epochs_per_slashings_vector: 64,
        sync_committee_size: 32,
        max_withdrawals_per_payload: 4,
        max_blob_commitments_per_block: 32,
        slots_per_epoch: 8,
        epochs_per_eth1_voting_period: 4,
    };

    pub const fn of(name: PresetName) -> Self {
        match name {
            PresetName::Mainnet => Self::MAINNET,
            PresetName::Minimal => Self::MINIMAL,
        }
    }

    /// Upper bound of the state's eth1 data votes list.
    pub const fn eth1_data_votes_limit(&self) -> usize {
        self.slots_per_epoch * self.epochs_per_eth1_voting_period
    }

    /// Parses a YAML preset mapping, e.g. the contents of `minimal-preset.yaml`.
    ///
    /// Keys the object graph does not depend on are ignored.
    pub fn from_yaml(name: PresetName, yaml: &str) -> Result<Self> {
        let values: YamlPreset =
            serde_yaml::from_str(yaml).map_err(|e| Error::InvalidPreset {
                name,
                reason: e.to_string(),
            })?;

        let preset = values.into_preset(name);
        preset.validate()?;

        Ok(preset)
    }

    pub fn to_yaml(&self) -> String {
        let values = YamlPreset::from(*self);
        // a flat struct of integers always serializes
        serde_yaml::to_string(&values).unwrap_or_default()
    }

    fn validate(&self) -> Result<()> {
        let bounds = [
            ("SLOTS_PER_HISTORICAL_ROOT", self.slots_per_historical_root),
            ("EPOCHS_PER_HISTORICAL_VECTOR", self.epochs_per_historical_vector),
            ("EPOCHS_PER_SLASHINGS_VECTOR", self.epochs_per_slashings_vector),
            ("SYNC_COMMITTEE_SIZE", self.sync_committee_size),
            ("MAX_WITHDRAWALS_PER_PAYLOAD", self.max_withdrawals_per_payload),
            ("MAX_BLOB_COMMITMENTS_PER_BLOCK", self.max_blob_commitments_per_block),
            ("SLOTS_PER_EPOCH", self.slots_per_epoch),
            ("EPOCHS_PER_ETH1_VOTING_PERIOD", self.epochs_per_eth1_voting_period),
        ];

        if let Some((key, _)) = bounds.iter().find(|(_, value)| *value == 0) {
            return Err(Error::InvalidPreset {
                name: self.name,
                reason: format!("{key} must be positive"),
            });
        }

        Ok(())
    }
}

/// Looks up one of the compiled-in presets by name.
pub fn preset_for(name: &str) -> Result<Preset> {
    let name = PresetName::from_str(name)?;
    Ok(Preset::of(name))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct YamlPreset {
    slots_per_historical_root: usize,
    epochs_per_historical_vector: usize,
    epochs_per_slashings_vector: usize,
    sync_committee_size: usize,
    max_withdrawals_per_payload: usize,
    max_blob_commitments_per_block: usize,
    slots_per_epoch: usize,
    epochs_per_eth1_voting_period: usize,
}

impl YamlPreset {
    fn into_preset(self, name: PresetName) -> Preset {
        Preset {
            name,
            slots_per_historical_root: self.slots_per_historical_root,
            epochs_per_historical_vector: self.epochs_per_historical_vector,
            epochs_per_slashings_vector: self.epochs_per_slashings_vector,
            sync_committee_size: self.sync_committee_size,
            max_withdrawals_per_payload: self.max_withdrawals_per_payload,
            max_blob_commitments_per_block: self.max_blob_commitments_per_block,
            slots_per_epoch: self.slots_per_epoch,
            epochs_per_eth1_voting_period: self.epochs_per_eth1_voting_period,
        }
    }
}

impl From<Preset> for YamlPreset {
    fn from(preset: Preset) -> Self {
        Self {
            slots_per_historical_root: preset.slots_per_historical_root,
            epochs_per_historical_vector: preset.epochs_per_historical_vector,
            epochs_per_slashings_vector: preset.epochs_per_slashings_vector,
            sync_committee_size: preset.sync_committee_size,
            max_withdrawals_per_payload: preset.max_withdrawals_per_payload,
            max_blob_commitments_per_block: preset.max_blob_commitments_per_block,
            slots_per_epoch: preset.slots_per_epoch,
            epochs_per_eth1_voting_period: preset.epochs_per_eth1_voting_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    const MAINNET_YAML: &str = include_str!("../../../res/presets/mainnet-preset.yaml");
    const MINIMAL_YAML: &str = include_str!("../../../res/presets/minimal-preset.yaml");

    #[test_case("mainnet", Preset::MAINNET; "mainnet")]
    #[test_case("minimal", Preset::MINIMAL; "minimal")]
    fn looks_up_presets_by_name(name: &str, expected: Preset) {
        // when
        let preset = preset_for(name).unwrap();

        // then
        assert_eq!(preset, expected);
    }

    #[test_case("Mainnet"; "wrong case")]
    #[test_case("gnosis"; "unsupported network")]
    #[test_case(""; "empty")]
    fn rejects_unknown_preset_names(name: &str) {
        // when
        let err = preset_for(name).unwrap_err();

        // then
        assert_eq!(err, Error::UnknownPreset(name.to_string()));
    }

    #[test]
    fn minimal_bounds_never_exceed_mainnet_bounds() {
        let (mainnet, minimal) = (Preset::MAINNET, Preset::MINIMAL);

        assert!(minimal.slots_per_historical_root <= mainnet.slots_per_historical_root);
        assert!(minimal.epochs_per_historical_vector <= mainnet.epochs_per_historical_vector);
        assert!(minimal.epochs_per_slashings_vector <= mainnet.epochs_per_slashings_vector);
        assert!(minimal.sync_committee_size <= mainnet.sync_committee_size);
        assert!(minimal.max_withdrawals_per_payload <= mainnet.max_withdrawals_per_payload);
        assert!(minimal.max_blob_commitments_per_block <= mainnet.max_blob_commitments_per_block);
        assert!(minimal.slots_per_epoch <= mainnet.slots_per_epoch);
        assert!(minimal.epochs_per_eth1_voting_period <= mainnet.epochs_per_eth1_voting_period);
    }

    #[test]
    fn computes_eth1_data_votes_limit() {
        assert_eq!(Preset::MAINNET.eth1_data_votes_limit(), 2048);
        assert_eq!(Preset::MINIMAL.eth1_data_votes_limit(), 32);
    }

    #[test_case(PresetName::Mainnet, MAINNET_YAML; "mainnet")]
    #[test_case(PresetName::Minimal, MINIMAL_YAML; "minimal")]
    fn shipped_yaml_files_match_compiled_constants(name: PresetName, yaml: &str) {
        // when
        let preset = Preset::from_yaml(name, yaml).unwrap();

        // then
        assert_eq!(preset, Preset::of(name));
    }

    #[test]
    fn yaml_rendering_can_be_parsed_back() {
        // given
        let yaml = Preset::MINIMAL.to_yaml();

        // when
        let preset = Preset::from_yaml(PresetName::Minimal, &yaml).unwrap();

        // then
        assert_eq!(preset, Preset::MINIMAL);
        assert!(yaml.contains("SYNC_COMMITTEE_SIZE: 32"));
    }

    #[test]
    fn ignores_keys_the_object_graph_does_not_use() {
        // given
        let yaml = format!("{MINIMAL_YAML}\nMAX_COMMITTEES_PER_SLOT: 4\n");

        // when
        let preset = Preset::from_yaml(PresetName::Minimal, &yaml).unwrap();

        // then
        assert_eq!(preset, Preset::MINIMAL);
    }

    #[test]
    fn rejects_zero_bounds() {
        // given
        let yaml = MINIMAL_YAML.replace("SLOTS_PER_EPOCH: 8", "SLOTS_PER_EPOCH: 0");

        // when
        let err = Preset::from_yaml(PresetName::Minimal, &yaml).unwrap_err();

        // then
        assert_eq!(err.to_string(), "invalid minimal preset: SLOTS_PER_EPOCH must be positive");
    }

    #[test]
    fn rejects_missing_bounds() {
        // given
        let yaml = "SLOTS_PER_EPOCH: 8\n";

        // when
        let err = Preset::from_yaml(PresetName::Minimal, yaml).unwrap_err();

        // then
        assert!(matches!(err, Error::InvalidPreset { name: PresetName::Minimal, .. }));
    }
}
