//! State definitions for the gateway contract
//!
//! Signer sets, the replay set, the token registry, both approval ledgers and
//! the freeze registry all live here. Commands that wait on a token contract
//! additionally park an undo record in `PENDING_COMMANDS` until their reply,
//! and the batch's outcomes wait in `BATCH_OUTCOMES` for the replies to settle.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Event, HexBinary, Uint128};
use cw_storage_plus::{Item, Map};

use crate::msg::CommandOutcome;

// ============================================================================
// Core Configuration
// ============================================================================

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address, the only account allowed to rotate signers
    pub admin: Addr,
    /// Chain id every command batch must carry
    pub chain_id: u64,
    /// Code id of the cw20 contract instantiated for gateway-deployed tokens
    pub token_code_id: u64,
}

/// A role's signer set.
#[cw_serde]
pub struct SignerSet {
    /// 20-byte Ethereum addresses, distinct
    pub members: Vec<HexBinary>,
    /// Number of distinct member signatures a batch needs
    pub threshold: u32,
}

impl SignerSet {
    pub fn contains(&self, signer: &[u8]) -> bool {
        self.members.iter().any(|member| member.as_slice() == signer)
    }
}

/// Registered token
#[cw_serde]
pub struct TokenRecord {
    pub symbol: String,
    pub name: String,
    pub address: Addr,
    pub decimals: u8,
    /// Maximum gateway-minted supply (0 = uncapped)
    pub cap: Uint128,
    /// Token existed before registration; the gateway locks and releases it
    /// instead of burning and minting.
    pub is_external: bool,
}

// ============================================================================
// Pending Token Commands
// ============================================================================

/// Gateway writes to revert when a command's token message fails.
#[cw_serde]
pub enum Undo {
    Deploy { symbol: String },
    Mint { symbol: String, amount: Uint128 },
}

/// A command whose token message has been dispatched but not yet answered.
#[cw_serde]
pub struct PendingCommand {
    pub command_id: HexBinary,
    /// Wire name of the command
    pub command: String,
    /// Position of the command's entry in `BATCH_OUTCOMES`
    pub outcome_index: u32,
    pub undo: Undo,
    /// Emitted once the token contract accepts the message
    pub events: Vec<Event>,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:gateway";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Signer sets by role
/// Key: role wire value (1 = owner, 2 = operator), Value: SignerSet
pub const SIGNER_SETS: Map<u8, SignerSet> = Map::new("signer_sets");

/// Replay set
/// Key: 32-byte command id, Value: always true
pub const EXECUTED_COMMANDS: Map<&[u8], bool> = Map::new("executed_commands");

// ============================================================================
// Token Registry
// ============================================================================

/// Registered tokens
/// Key: symbol, Value: TokenRecord
pub const TOKENS: Map<&str, TokenRecord> = Map::new("tokens");

/// Supply minted through the gateway minus supply burned through it.
/// Only tracked for gateway-deployed tokens.
pub const TOKEN_SUPPLY: Map<&str, Uint128> = Map::new("token_supply");

// ============================================================================
// Approval Ledger
// ============================================================================

/// Approved, unconsumed contract calls
/// Key: 32-byte approval key, Value: always true
pub const CONTRACT_CALL_APPROVALS: Map<&[u8], bool> = Map::new("contract_call_approvals");

/// Approved, unconsumed contract calls carrying a mint
/// Key: 32-byte approval key, Value: always true
pub const MINT_APPROVALS: Map<&[u8], bool> = Map::new("mint_approvals");

// ============================================================================
// Freeze Registry
// ============================================================================

/// Global freeze switch
pub const ALL_TOKENS_FROZEN: Item<bool> = Item::new("all_tokens_frozen");

/// Frozen symbols. Symbols may be frozen before they are registered.
pub const FROZEN_TOKENS: Map<&str, bool> = Map::new("frozen_tokens");

// ============================================================================
// Reply Tracking
// ============================================================================

/// Commands awaiting a reply from their token contract
/// Key: reply id, Value: PendingCommand
pub const PENDING_COMMANDS: Map<u64, PendingCommand> = Map::new("pending_commands");

/// Next reply id to hand out
pub const NEXT_REPLY_ID: Item<u64> = Item::new("next_reply_id");

/// Outcomes of the batch whose token replies are outstanding
/// Removed once the last pending command settles
pub const BATCH_OUTCOMES: Item<Vec<CommandOutcome>> = Item::new("batch_outcomes");
