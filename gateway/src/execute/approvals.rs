//! Approval ledger.
//!
//! Approval commands record that a cross-chain call may be delivered to a
//! destination contract. The destination later consumes the approval by
//! sending one of the validate messages itself; a call with no matching
//! approval answers `approved: false` instead of failing.

use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, Event, HexBinary, MessageInfo, Response, StdResult,
    Uint128,
};

use super::tokens::{load_token, prepare_mint};
use super::CommandEffect;
use crate::command::{
    decode_params, ApproveContractCallParams, ApproveContractCallWithMintParams, CommandKind,
};
use crate::error::ContractError;
use crate::hash::{contract_call_approval_key, mint_approval_key, to_bytes32};
use crate::state::{CONTRACT_CALL_APPROVALS, MINT_APPROVALS};
use common::ValidateResponse;

fn payload_hash_arg(kind: CommandKind, payload_hash: &HexBinary) -> Result<[u8; 32], ContractError> {
    to_bytes32(payload_hash.as_slice()).ok_or_else(|| {
        ContractError::malformed(
            kind.name(),
            format!("payload_hash must be 32 bytes, got {}", payload_hash.len()),
        )
    })
}

// ============================================================================
// Approval Commands
// ============================================================================

pub fn approve_contract_call(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let kind = CommandKind::ApproveContractCall;
    let params: ApproveContractCallParams = decode_params(kind, params)?;
    let payload_hash = payload_hash_arg(kind, &params.payload_hash)?;
    let contract_address = deps.api.addr_validate(&params.contract_address)?;

    let key = contract_call_approval_key(
        &params.source_chain,
        &params.source_address,
        contract_address.as_str(),
        &payload_hash,
    );
    CONTRACT_CALL_APPROVALS.save(deps.storage, &key, &true)?;

    Ok(CommandEffect::done(vec![Event::new("contract_call_approved")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("source_chain", params.source_chain)
        .add_attribute("source_address", params.source_address)
        .add_attribute("contract_address", contract_address)
        .add_attribute("payload_hash", params.payload_hash.to_hex())
        .add_attribute("source_tx_hash", params.source_tx_hash.to_hex())
        .add_attribute("source_event_index", params.source_event_index.to_string())]))
}

pub fn approve_contract_call_with_mint(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let kind = CommandKind::ApproveContractCallWithMint;
    let params: ApproveContractCallWithMintParams = decode_params(kind, params)?;
    let payload_hash = payload_hash_arg(kind, &params.payload_hash)?;
    let contract_address = deps.api.addr_validate(&params.contract_address)?;
    // Freeze and cap are checked when the approval is consumed.
    load_token(deps.storage, &params.symbol)?;
    if params.amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "approved mint amount must be greater than zero".to_string(),
        });
    }

    let key = mint_approval_key(
        &params.source_chain,
        &params.source_address,
        contract_address.as_str(),
        &payload_hash,
        &params.symbol,
        params.amount,
    );
    MINT_APPROVALS.save(deps.storage, &key, &true)?;

    Ok(CommandEffect::done(vec![Event::new(
        "contract_call_approved_with_mint",
    )
    .add_attribute("command_id", command_id.to_hex())
    .add_attribute("source_chain", params.source_chain)
    .add_attribute("source_address", params.source_address)
    .add_attribute("contract_address", contract_address)
    .add_attribute("payload_hash", params.payload_hash.to_hex())
    .add_attribute("symbol", params.symbol)
    .add_attribute("amount", params.amount)
    .add_attribute("source_tx_hash", params.source_tx_hash.to_hex())
    .add_attribute("source_event_index", params.source_event_index.to_string())]))
}

// ============================================================================
// Lookups
// ============================================================================

pub fn is_contract_call_approved(
    deps: Deps,
    source_chain: &str,
    source_address: &str,
    contract_address: &str,
    payload_hash: &HexBinary,
) -> StdResult<bool> {
    let Some(payload_hash) = to_bytes32(payload_hash.as_slice()) else {
        return Ok(false);
    };
    let key =
        contract_call_approval_key(source_chain, source_address, contract_address, &payload_hash);
    Ok(CONTRACT_CALL_APPROVALS.has(deps.storage, &key))
}

pub fn is_contract_call_and_mint_approved(
    deps: Deps,
    source_chain: &str,
    source_address: &str,
    contract_address: &str,
    payload_hash: &HexBinary,
    symbol: &str,
    amount: Uint128,
) -> StdResult<bool> {
    let Some(payload_hash) = to_bytes32(payload_hash.as_slice()) else {
        return Ok(false);
    };
    let key = mint_approval_key(
        source_chain,
        source_address,
        contract_address,
        &payload_hash,
        symbol,
        amount,
    );
    Ok(MINT_APPROVALS.has(deps.storage, &key))
}

// ============================================================================
// Consumption (sender is the destination contract)
// ============================================================================

fn validate_response(approved: bool) -> StdResult<Binary> {
    to_json_binary(&ValidateResponse { approved })
}

/// Consume a plain contract-call approval addressed to the sender.
pub fn execute_validate_contract_call(
    deps: DepsMut,
    info: MessageInfo,
    source_chain: String,
    source_address: String,
    payload_hash: HexBinary,
) -> Result<Response, ContractError> {
    let key = to_bytes32(payload_hash.as_slice()).map(|hash| {
        contract_call_approval_key(&source_chain, &source_address, info.sender.as_str(), &hash)
    });

    let approved = match key {
        Some(key) if CONTRACT_CALL_APPROVALS.has(deps.storage, &key) => {
            CONTRACT_CALL_APPROVALS.remove(deps.storage, &key);
            true
        }
        _ => false,
    };

    let mut response = Response::new()
        .add_attribute("method", "validate_contract_call")
        .add_attribute("approved", approved.to_string())
        .set_data(validate_response(approved)?);

    if approved {
        response = response.add_event(
            Event::new("contract_call_executed")
                .add_attribute("contract_address", info.sender)
                .add_attribute("source_chain", source_chain)
                .add_attribute("source_address", source_address)
                .add_attribute("payload_hash", payload_hash.to_hex()),
        );
    }
    Ok(response)
}

/// Consume a mint-carrying approval addressed to the sender and deliver its tokens.
///
/// A failing freeze or cap check aborts the whole call, which leaves the
/// approval in place.
pub fn execute_validate_contract_call_and_mint(
    deps: DepsMut,
    info: MessageInfo,
    source_chain: String,
    source_address: String,
    payload_hash: HexBinary,
    symbol: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let key = to_bytes32(payload_hash.as_slice()).map(|hash| {
        mint_approval_key(
            &source_chain,
            &source_address,
            info.sender.as_str(),
            &hash,
            &symbol,
            amount,
        )
    });

    let key = match key {
        Some(key) if MINT_APPROVALS.has(deps.storage, &key) => key,
        _ => {
            return Ok(Response::new()
                .add_attribute("method", "validate_contract_call_and_mint")
                .add_attribute("approved", "false")
                .set_data(validate_response(false)?))
        }
    };

    let (token, mint_msg) = prepare_mint(deps.storage, &symbol, &info.sender, amount)?;
    MINT_APPROVALS.remove(deps.storage, &key);

    Ok(Response::new()
        .add_message(mint_msg)
        .add_attribute("method", "validate_contract_call_and_mint")
        .add_attribute("approved", "true")
        .add_event(
            Event::new("contract_call_executed_with_mint")
                .add_attribute("contract_address", info.sender)
                .add_attribute("source_chain", source_chain)
                .add_attribute("source_address", source_address)
                .add_attribute("payload_hash", payload_hash.to_hex())
                .add_attribute("symbol", symbol)
                .add_attribute("amount", amount)
                .add_attribute("is_external", token.is_external.to_string()),
        )
        .set_data(validate_response(true)?))
}
