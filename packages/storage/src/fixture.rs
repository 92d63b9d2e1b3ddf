use std::{fmt::Display, str::FromStr};

use presets::PresetName;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Block,
    State,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown object kind '{0}', expected block or state")]
pub struct UnknownObjectKind(pub String);

impl ObjectKind {
    pub const ALL: [ObjectKind; 2] = [ObjectKind::Block, ObjectKind::State];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::State => "state",
        }
    }

    /// Capitalized name used in benchmark result names, e.g. `Block`.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::State => "State",
        }
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "block" => Ok(Self::Block),
            "state" => Ok(Self::State),
            other => Err(UnknownObjectKind(other.to_string())),
        }
    }
}

/// Fixtures are keyed by object kind and preset only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureId {
    pub kind: ObjectKind,
    pub preset: PresetName,
}

impl FixtureId {
    pub const fn new(kind: ObjectKind, preset: PresetName) -> Self {
        Self { kind, preset }
    }

    /// Every fixture a generation run produces.
    pub fn all() -> impl Iterator<Item = FixtureId> {
        PresetName::ALL.into_iter().flat_map(|preset| {
            ObjectKind::ALL
                .into_iter()
                .map(move |kind| FixtureId::new(kind, preset))
        })
    }

    pub fn data_file_name(&self) -> String {
        format!("{self}.ssz")
    }

    pub fn meta_file_name(&self) -> String {
        format!("{self}-meta.json")
    }
}

impl Display for FixtureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.kind, self.preset)
    }
}

/// A 32 byte hash tree root, rendered as 64 lowercase hex characters without prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDigest {
    #[error("digest is not valid hex: {0}")]
    Hex(String),
    #[error("digest must be 32 bytes, got {0}")]
    Length(usize),
}

impl Digest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<Digest> for [u8; 32] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl FromStr for Digest {
    type Err = InvalidDigest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| InvalidDigest::Hex(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|bytes: Vec<u8>| InvalidDigest::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

/// The serialized object together with its ground-truth digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: FixtureId,
    pub bytes: Vec<u8>,
    pub digest: Digest,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Metadata {
    pub htr: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case(ObjectKind::Block, PresetName::Mainnet, "block-mainnet.ssz", "block-mainnet-meta.json"; "mainnet block")]
    #[test_case(ObjectKind::State, PresetName::Minimal, "state-minimal.ssz", "state-minimal-meta.json"; "minimal state")]
    fn file_names_follow_kind_and_preset(
        kind: ObjectKind,
        preset: PresetName,
        data: &str,
        meta: &str,
    ) {
        // given
        let id = FixtureId::new(kind, preset);

        // then
        assert_eq!(id.data_file_name(), data);
        assert_eq!(id.meta_file_name(), meta);
    }

    #[test]
    fn a_run_produces_four_fixtures() {
        assert_eq!(FixtureId::all().count(), 4);
    }

    #[test]
    fn digest_renders_lowercase_hex() {
        // given
        let digest = Digest::new([0xab; 32]);

        // when
        let rendered = digest.to_string();

        // then
        assert_eq!(rendered, "ab".repeat(32));
        assert_eq!(rendered.parse::<Digest>().unwrap(), digest);
    }

    #[test_case("0x".to_string() + &"00".repeat(32); "prefixed")]
    #[test_case("zz".repeat(32); "not hex")]
    fn rejects_non_hex_digests(text: String) {
        assert!(matches!(text.parse::<Digest>(), Err(InvalidDigest::Hex(_))));
    }

    #[test_case("00".repeat(31), 31; "short")]
    #[test_case("00".repeat(33), 33; "long")]
    fn rejects_digests_of_the_wrong_length(text: String, len: usize) {
        assert_eq!(text.parse::<Digest>(), Err(InvalidDigest::Length(len)));
    }

    #[test]
    fn parses_object_kinds() {
        assert_eq!("state".parse::<ObjectKind>().unwrap(), ObjectKind::State);
        assert_eq!(
            "blocks".parse::<ObjectKind>().unwrap_err(),
            UnknownObjectKind("blocks".to_string())
        );
    }
}
