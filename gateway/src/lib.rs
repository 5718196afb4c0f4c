//! Gateway Contract - Quorum-Authorized Cross-Chain Commands
//!
//! This contract admits signed command batches and keeps the ledgers that let
//! cross-chain calls be delivered exactly once.
//!
//! # Incoming Flow
//! 1. Signers of a role (owner or operator) sign a JSON `CommandBatch`
//! 2. Anyone submits it with `Execute`; the gateway checks chain id and quorum
//! 3. Each command runs in order; consumed ids are skipped, failures are
//!    reported per command
//! 4. An approved destination contract pulls its call with
//!    `ValidateContractCall` / `ValidateContractCallAndMint`
//!
//! # Outgoing Flow
//! 1. A caller sends `CallContract` or `CallContractWithToken`
//! 2. Tokens are burned (gateway-deployed) or locked (external)
//! 3. The relayer observes the `contract_call*` event and brings it to the
//!    destination gateway as an approval command
//!
//! # Security
//! - Distinct-signer quorum per role over an Ethereum signed-message hash
//! - Replay set of consumed command ids
//! - Per-token and global freeze
//! - Approvals bound to destination, payload hash and (for mints) symbol and amount

pub mod auth;
pub mod command;
pub mod contract;
pub mod error;
mod execute;
pub mod hash;
pub mod msg;
mod query;
pub mod state;

pub use crate::command::{CommandBatch, CommandKind, RawCommand};
pub use crate::error::ContractError;
pub use crate::hash::{batch_signing_hash, keccak256};
