//! Synthetic Deneb beacon blocks and states.
//!
//! The generated graphs are structurally valid under a preset (every vector has its exact length,
//! every list stays within its limit) but carry random content. They are meant to exercise codecs,
//! not consensus rules.

mod block;
mod random;
mod state;

use beacon_types::{
    BeaconState, SignedBeaconBlock,
    bounds::{MAX_BYTES_PER_TRANSACTION, MAX_TRANSACTIONS_PER_PAYLOAD},
};
use presets::Preset;
use serde::{Deserialize, Serialize};

use crate::random::Random;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid generation config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Requested sizes of the generated graphs.
///
/// List counts are requests: each one is clamped to the protocol or preset maximum of its list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validators: usize,
    pub transactions: usize,
    pub tx_min_size: usize,
    pub tx_max_size: usize,
    pub attestations: usize,
    pub deposits: usize,
    pub proposer_slashings: usize,
    pub attester_slashings: usize,
    pub voluntary_exits: usize,
    pub bls_changes: usize,
    pub withdrawals: usize,
    pub blob_commitments: usize,
    pub slot: u64,
    /// `0` draws from OS entropy, anything else makes the output reproducible.
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validators: 100_000,
            transactions: 100,
            tx_min_size: 500,
            tx_max_size: 700,
            attestations: 128,
            deposits: 16,
            proposer_slashings: 16,
            attester_slashings: 2,
            voluntary_exits: 16,
            bls_changes: 16,
            withdrawals: 16,
            blob_commitments: 32,
            slot: 1000,
            seed: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.validators == 0 {
            return Err(Error::InvalidConfig(
                "validator count must be at least 1".to_string(),
            ));
        }

        if self.tx_min_size > self.tx_max_size {
            return Err(Error::InvalidConfig(format!(
                "transaction min size ({}) exceeds max size ({})",
                self.tx_min_size, self.tx_max_size
            )));
        }

        if self.tx_max_size > MAX_BYTES_PER_TRANSACTION {
            return Err(Error::InvalidConfig(format!(
                "transaction max size ({}) exceeds the protocol limit of {MAX_BYTES_PER_TRANSACTION} bytes",
                self.tx_max_size
            )));
        }

        Ok(())
    }

    pub(crate) fn transaction_count(&self) -> usize {
        self.transactions.min(MAX_TRANSACTIONS_PER_PAYLOAD)
    }
}

const BLOCK_STREAM: u64 = 0x626c_6f63_6b00_0000;
const STATE_STREAM: u64 = 0x7374_6174_6500_0000;

/// Generates blocks and states for one preset.
#[derive(Debug, Clone)]
pub struct Generator {
    config: Config,
    preset: Preset,
}

impl Generator {
    pub fn new(config: Config, preset: Preset) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, preset })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    /// A signed block. With a non-zero seed the same config and preset always give the same block.
    pub fn block(&self) -> SignedBeaconBlock {
        let mut random = Random::for_stream(self.config.seed, BLOCK_STREAM);
        let block = block::signed_block(&self.config, &self.preset, &mut random);

        let body = &block.message.body;
        tracing::info!(
            "generated {} block at slot {}: {} attestations, {} transactions, {} withdrawals, {} blob commitments",
            self.preset.name,
            block.message.slot,
            body.attestations.len(),
            body.execution_payload.transactions.len(),
            body.execution_payload.withdrawals.len(),
            body.blob_kzg_commitments.len(),
        );

        block
    }

    /// A state. With a non-zero seed the same config and preset always give the same state.
    pub fn state(&self) -> BeaconState {
        let mut random = Random::for_stream(self.config.seed, STATE_STREAM);
        let state = state::beacon_state(&self.config, &self.preset, &mut random);

        tracing::info!(
            "generated {} state at slot {}: {} validators, {} eth1 votes",
            self.preset.name,
            state.slot,
            state.validators.len(),
            state.eth1_data_votes.len(),
        );

        state
    }
}

/// Marks the first two thirds (rounded down) of `bits` as set.
pub(crate) fn set_two_thirds(bits: &mut beacon_types::Bitfield) {
    let set = bits.len() * 2 / 3;
    for index in 0..set {
        // index < len
        let _ = bits.set(index, true);
    }
}
