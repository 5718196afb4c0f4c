//! Message types for the gateway contract
//!
//! This module defines all messages for instantiation, execution, and queries.

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, HexBinary, Uint128};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Initial signer set of one role
#[cw_serde]
pub struct SignerSetMsg {
    /// 20-byte Ethereum addresses
    pub members: Vec<HexBinary>,
    pub threshold: u32,
}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address, allowed to rotate signer sets
    pub admin: String,
    /// Chain id command batches must be signed for
    pub chain_id: u64,
    /// Code id of the cw20 contract used for gateway-deployed tokens
    pub token_code_id: u64,
    pub owner_signers: SignerSetMsg,
    pub operator_signers: SignerSetMsg,
}

// ============================================================================
// Execute Messages
// ============================================================================

/// Execute messages
#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Command Batches
    // ========================================================================
    /// Execute a signed command batch
    ///
    /// Authorization: quorum of the batch role's signers (anyone may submit)
    ///
    /// Response data is an `ExecuteBatchResponse` with one outcome per command.
    Execute {
        /// JSON-encoded `CommandBatch`, exactly the bytes that were signed
        data: Binary,
        /// 65-byte `r || s || v` signatures
        signatures: Vec<Binary>,
    },

    // ========================================================================
    // Outgoing Calls
    // ========================================================================
    /// Record a cross-chain contract call for the relayer
    CallContract {
        destination_chain: String,
        destination_address: String,
        payload: Binary,
    },

    /// Record a cross-chain contract call carrying tokens
    ///
    /// The caller must have granted the gateway an allowance of at least
    /// `amount`. Gateway-deployed tokens are burned, external tokens locked.
    CallContractWithToken {
        destination_chain: String,
        destination_address: String,
        payload: Binary,
        symbol: String,
        amount: Uint128,
    },

    // ========================================================================
    // Approval Consumption (sender is the destination contract)
    // ========================================================================
    /// Consume an approved contract call. Data: `ValidateResponse`.
    ValidateContractCall {
        source_chain: String,
        source_address: String,
        payload_hash: HexBinary,
    },

    /// Consume an approved contract call and receive its tokens. Data: `ValidateResponse`.
    ValidateContractCallAndMint {
        source_chain: String,
        source_address: String,
        payload_hash: HexBinary,
        symbol: String,
        amount: Uint128,
    },

    // ========================================================================
    // Admin Operations
    // ========================================================================
    /// Replace a role's signer set
    ///
    /// Authorization: Admin only
    RotateSigners {
        /// 1 = owner, 2 = operator
        role: u8,
        members: Vec<HexBinary>,
        threshold: u32,
    },

    /// Hand the admin role to another address
    ///
    /// Authorization: Admin only
    UpdateAdmin { new_admin: String },
}

// ============================================================================
// Execute Responses
// ============================================================================

/// Per-command result of a batch
#[cw_serde]
pub struct ExecuteBatchResponse {
    pub outcomes: Vec<CommandOutcome>,
}

#[cw_serde]
pub struct CommandOutcome {
    pub command_id: HexBinary,
    pub status: CommandStatus,
}

#[cw_serde]
pub enum CommandStatus {
    /// Handler succeeded and the id was consumed. A command whose token
    /// message fails is reported as `Failed` instead.
    Applied,
    Skipped { reason: SkipReason },
    Failed { reason: String },
}

#[cw_serde]
pub enum SkipReason {
    AlreadyExecuted,
    UnknownCommand,
}

// ============================================================================
// Query Messages
// ============================================================================

/// Query messages
#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    // ========================================================================
    // Core Queries
    // ========================================================================
    /// Returns contract configuration
    #[returns(ConfigResponse)]
    Config {},

    /// Returns the signer set of a role
    #[returns(SignersResponse)]
    Signers { role: u8 },

    /// Returns whether a command id has been consumed
    #[returns(CommandExecutedResponse)]
    IsCommandExecuted { command_id: HexBinary },

    // ========================================================================
    // Token Registry
    // ========================================================================
    /// Returns a registered token
    #[returns(TokenResponse)]
    Token { symbol: String },

    /// Returns registered tokens (paginated)
    #[returns(TokensResponse)]
    Tokens {
        start_after: Option<String>,
        limit: Option<u32>,
    },

    /// Returns the address of a registered token
    #[returns(TokenAddressResponse)]
    TokenAddress { symbol: String },

    /// Returns the address a gateway-deployed token with these parameters gets
    #[returns(TokenAddressResponse)]
    PredictTokenAddress {
        symbol: String,
        decimals: u8,
        cap: Uint128,
    },

    /// Returns freeze state of a symbol
    #[returns(FreezeStatusResponse)]
    FreezeStatus { symbol: String },

    // ========================================================================
    // Approval Ledger
    // ========================================================================
    /// Returns whether a contract call is approved and unconsumed
    #[returns(ApprovalResponse)]
    IsContractCallApproved {
        source_chain: String,
        source_address: String,
        contract_address: String,
        payload_hash: HexBinary,
    },

    /// Returns whether a mint-carrying contract call is approved and unconsumed
    #[returns(ApprovalResponse)]
    IsContractCallAndMintApproved {
        source_chain: String,
        source_address: String,
        contract_address: String,
        payload_hash: HexBinary,
        symbol: String,
        amount: Uint128,
    },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub chain_id: u64,
    pub token_code_id: u64,
}

#[cw_serde]
pub struct SignersResponse {
    pub role: u8,
    pub members: Vec<HexBinary>,
    pub threshold: u32,
}

#[cw_serde]
pub struct CommandExecutedResponse {
    pub executed: bool,
}

#[cw_serde]
pub struct TokenResponse {
    pub symbol: String,
    pub name: String,
    pub address: Addr,
    pub decimals: u8,
    pub cap: Uint128,
    pub is_external: bool,
    /// Minted minus burned through the gateway (always zero for external tokens)
    pub gateway_supply: Uint128,
}

#[cw_serde]
pub struct TokensResponse {
    pub tokens: Vec<TokenResponse>,
}

#[cw_serde]
pub struct TokenAddressResponse {
    pub address: Addr,
}

#[cw_serde]
pub struct FreezeStatusResponse {
    pub symbol: String,
    pub token_frozen: bool,
    pub all_tokens_frozen: bool,
}

#[cw_serde]
pub struct ApprovalResponse {
    pub approved: bool,
}
