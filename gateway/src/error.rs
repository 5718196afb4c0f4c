//! Error types for the gateway contract
//!
//! Batch-level errors (chain id, role, quorum, decoding) reject a whole batch.
//! Command-level errors are caught by the dispatcher and reported as a failed
//! outcome for that command only.

use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: only admin can perform this action")]
    Unauthorized,

    #[error("Quorum not met for {role} signers: got {got}, need {required}")]
    QuorumNotMet {
        role: String,
        got: u32,
        required: u32,
    },

    #[error("Unknown signer role: {role}")]
    UnknownRole { role: u32 },

    #[error("Invalid signer set: {reason}")]
    InvalidSignerSet { reason: String },

    // ========================================================================
    // Batch Errors
    // ========================================================================

    #[error("Invalid chain ID: expected {expected}, got {got}")]
    InvalidChainId { expected: u64, got: u64 },

    #[error("Command batch contains no commands")]
    EmptyBatch,

    #[error("Malformed command batch: {reason}")]
    MalformedBatch { reason: String },

    #[error("Malformed arguments for {command}: {reason}")]
    MalformedArgs { command: String, reason: String },

    // ========================================================================
    // Token Registry Errors
    // ========================================================================

    #[error("Token symbol already registered: {symbol}")]
    DuplicateSymbol { symbol: String },

    #[error("Unknown token symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("Token is frozen: {symbol}")]
    TokenFrozen { symbol: String },

    #[error("Cap exceeded for {symbol}: cap {cap}, supply after mint {requested}")]
    CapExceeded {
        symbol: String,
        cap: Uint128,
        requested: Uint128,
    },

    #[error("Invalid amount: {reason}")]
    InvalidAmount { reason: String },

    // ========================================================================
    // Token Collaborator Errors
    // ========================================================================

    #[error("Insufficient balance: have {balance}, need {required}")]
    InsufficientBalance { balance: Uint128, required: Uint128 },

    #[error("Insufficient allowance: have {allowance}, need {required}")]
    InsufficientAllowance {
        allowance: Uint128,
        required: Uint128,
    },

    // ========================================================================
    // Reply Errors
    // ========================================================================

    #[error("No pending command for reply id {id}")]
    UnknownReply { id: u64 },
}

impl ContractError {
    pub fn malformed(command: &str, reason: impl ToString) -> Self {
        ContractError::MalformedArgs {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }
}
