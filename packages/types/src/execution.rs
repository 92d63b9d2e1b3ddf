use ssz_bench_encoding::{List, Root, container};

use crate::{
    Bytes32, ExecutionAddress, Gwei, Hash32, LogsBloom, Uint256, ValidatorIndex,
    WithdrawalIndex,
    bounds::{
        MaxBytesPerTransaction, MaxExtraDataBytes, MaxTransactionsPerPayload,
        MaxWithdrawalsPerPayload,
    },
};

pub type Transaction = List<u8, MaxBytesPerTransaction>;

container! {
    pub struct Withdrawal {
        pub index: WithdrawalIndex,
        pub validator_index: ValidatorIndex,
        pub address: ExecutionAddress,
        pub amount: Gwei,
    }
}

container! {
    pub struct ExecutionPayload {
        pub parent_hash: Hash32,
        pub fee_recipient: ExecutionAddress,
        pub state_root: Bytes32,
        pub receipts_root: Bytes32,
        pub logs_bloom: LogsBloom,
        pub prev_randao: Bytes32,
        pub block_number: u64,
        pub gas_limit: u64,
        pub gas_used: u64,
        pub timestamp: u64,
        pub extra_data: List<u8, MaxExtraDataBytes>,
        pub base_fee_per_gas: Uint256,
        pub block_hash: Hash32,
        pub transactions: List<Transaction, MaxTransactionsPerPayload>,
        pub withdrawals: List<Withdrawal, MaxWithdrawalsPerPayload>,
        pub blob_gas_used: u64,
        pub excess_blob_gas: u64,
    }
}

container! {
    pub struct ExecutionPayloadHeader {
        pub parent_hash: Hash32,
        pub fee_recipient: ExecutionAddress,
        pub state_root: Bytes32,
        pub receipts_root: Bytes32,
        pub logs_bloom: LogsBloom,
        pub prev_randao: Bytes32,
        pub block_number: u64,
        pub gas_limit: u64,
        pub gas_used: u64,
        pub timestamp: u64,
        pub extra_data: List<u8, MaxExtraDataBytes>,
        pub base_fee_per_gas: Uint256,
        pub block_hash: Hash32,
        pub transactions_root: Root,
        pub withdrawals_root: Root,
        pub blob_gas_used: u64,
        pub excess_blob_gas: u64,
    }
}
