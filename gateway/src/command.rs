//! Command batch decoding
//!
//! A batch arrives as opaque JSON bytes so that signers sign exactly what the
//! contract decodes. Each command names its handler and carries its own JSON
//! parameters, which are only decoded by that handler.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{from_json, Binary, HexBinary, Uint128};
use serde::de::DeserializeOwned;

use crate::error::ContractError;

/// Signed unit of work.
#[cw_serde]
pub struct CommandBatch {
    pub chain_id: u64,
    /// Signer role that must authorize the batch (1 = owner, 2 = operator)
    pub role: u32,
    pub commands: Vec<RawCommand>,
}

/// One command as carried in a batch.
#[cw_serde]
pub struct RawCommand {
    /// 32-byte caller-chosen unique id
    pub id: HexBinary,
    pub name: String,
    pub params: Binary,
}

/// Decode a batch, rejecting it as a whole on any structural defect.
pub fn decode_batch(data: &[u8]) -> Result<CommandBatch, ContractError> {
    let batch: CommandBatch = from_json(data).map_err(|e| ContractError::MalformedBatch {
        reason: e.to_string(),
    })?;

    if batch.commands.is_empty() {
        return Err(ContractError::EmptyBatch);
    }

    for (index, command) in batch.commands.iter().enumerate() {
        if command.id.len() != 32 {
            return Err(ContractError::MalformedBatch {
                reason: format!(
                    "command {} id must be 32 bytes, got {}",
                    index,
                    command.id.len()
                ),
            });
        }
    }

    Ok(batch)
}

// ============================================================================
// Command Vocabulary
// ============================================================================

/// Every command the gateway knows how to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandKind {
    DeployToken,
    MintToken,
    ApproveContractCall,
    ApproveContractCallWithMint,
    FreezeToken,
    UnfreezeToken,
    FreezeAllTokens,
    UnfreezeAllTokens,
}

impl CommandKind {
    pub const ALL: [CommandKind; 8] = [
        CommandKind::DeployToken,
        CommandKind::MintToken,
        CommandKind::ApproveContractCall,
        CommandKind::ApproveContractCallWithMint,
        CommandKind::FreezeToken,
        CommandKind::UnfreezeToken,
        CommandKind::FreezeAllTokens,
        CommandKind::UnfreezeAllTokens,
    ];

    /// Wire name carried in `RawCommand::name`.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::DeployToken => "deployToken",
            CommandKind::MintToken => "mintToken",
            CommandKind::ApproveContractCall => "approveContractCall",
            CommandKind::ApproveContractCallWithMint => "approveContractCallWithMint",
            CommandKind::FreezeToken => "freezeToken",
            CommandKind::UnfreezeToken => "unfreezeToken",
            CommandKind::FreezeAllTokens => "freezeAllTokens",
            CommandKind::UnfreezeAllTokens => "unfreezeAllTokens",
        }
    }

    pub fn from_name(name: &str) -> Option<CommandKind> {
        CommandKind::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Decode a command's parameters.
pub fn decode_params<T: DeserializeOwned>(
    kind: CommandKind,
    params: &Binary,
) -> Result<T, ContractError> {
    from_json(params).map_err(|e| ContractError::malformed(kind.name(), e))
}

// ============================================================================
// Command Parameters
// ============================================================================

#[cw_serde]
pub struct DeployTokenParams {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// 0 = uncapped
    pub cap: Uint128,
    /// Existing token to register instead of deploying a new one
    #[serde(default)]
    pub token_address: Option<String>,
}

#[cw_serde]
pub struct MintTokenParams {
    pub symbol: String,
    pub recipient: String,
    pub amount: Uint128,
}

#[cw_serde]
pub struct ApproveContractCallParams {
    pub source_chain: String,
    pub source_address: String,
    pub contract_address: String,
    pub payload_hash: HexBinary,
    pub source_tx_hash: HexBinary,
    pub source_event_index: u64,
}

#[cw_serde]
pub struct ApproveContractCallWithMintParams {
    pub source_chain: String,
    pub source_address: String,
    pub contract_address: String,
    pub payload_hash: HexBinary,
    pub symbol: String,
    pub amount: Uint128,
    pub source_tx_hash: HexBinary,
    pub source_event_index: u64,
}

#[cw_serde]
pub struct FreezeTokenParams {
    pub symbol: String,
}
