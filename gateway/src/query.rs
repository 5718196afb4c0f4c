//! Query handlers for the gateway contract.

use cosmwasm_std::{Deps, Env, HexBinary, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;

use crate::auth::Role;
use crate::execute::{
    is_contract_call_and_mint_approved, is_contract_call_approved, predict_token_address,
};
use crate::hash::token_salt;
use crate::msg::{
    ApprovalResponse, CommandExecutedResponse, ConfigResponse, FreezeStatusResponse,
    SignersResponse, TokenAddressResponse, TokenResponse, TokensResponse,
};
use crate::state::{
    TokenRecord, ALL_TOKENS_FROZEN, CONFIG, EXECUTED_COMMANDS, FROZEN_TOKENS, SIGNER_SETS, TOKENS,
    TOKEN_SUPPLY,
};

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        chain_id: config.chain_id,
        token_code_id: config.token_code_id,
    })
}

/// Query the signer set of a role.
pub fn query_signers(deps: Deps, role: u8) -> StdResult<SignersResponse> {
    let role = Role::from_value(role.into()).map_err(|e| StdError::generic_err(e.to_string()))?;
    let set = SIGNER_SETS.load(deps.storage, role.as_u8())?;
    Ok(SignersResponse {
        role: role.as_u8(),
        members: set.members,
        threshold: set.threshold,
    })
}

pub fn query_is_command_executed(
    deps: Deps,
    command_id: HexBinary,
) -> StdResult<CommandExecutedResponse> {
    Ok(CommandExecutedResponse {
        executed: EXECUTED_COMMANDS.has(deps.storage, command_id.as_slice()),
    })
}

// ============================================================================
// Token Registry Queries
// ============================================================================

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

fn token_response(deps: Deps, record: TokenRecord) -> StdResult<TokenResponse> {
    let gateway_supply = TOKEN_SUPPLY
        .may_load(deps.storage, &record.symbol)?
        .unwrap_or_default();
    Ok(TokenResponse {
        symbol: record.symbol,
        name: record.name,
        address: record.address,
        decimals: record.decimals,
        cap: record.cap,
        is_external: record.is_external,
        gateway_supply,
    })
}

/// Query a registered token.
pub fn query_token(deps: Deps, symbol: String) -> StdResult<TokenResponse> {
    let record = TOKENS.load(deps.storage, &symbol)?;
    token_response(deps, record)
}

/// Query registered tokens with pagination.
pub fn query_tokens(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<TokensResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let tokens = TOKENS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, record) = item?;
            token_response(deps, record)
        })
        .collect::<StdResult<Vec<_>>>()?;

    Ok(TokensResponse { tokens })
}

pub fn query_token_address(deps: Deps, symbol: String) -> StdResult<TokenAddressResponse> {
    let record = TOKENS.load(deps.storage, &symbol)?;
    Ok(TokenAddressResponse {
        address: record.address,
    })
}

/// Address a gateway-deployed token with these parameters would receive.
pub fn query_predict_token_address(
    deps: Deps,
    env: Env,
    symbol: String,
    decimals: u8,
    cap: Uint128,
) -> StdResult<TokenAddressResponse> {
    let config = CONFIG.load(deps.storage)?;
    let salt = token_salt(&symbol, decimals, cap);
    let address = predict_token_address(deps, &env, config.token_code_id, &salt)?;
    Ok(TokenAddressResponse { address })
}

pub fn query_freeze_status(deps: Deps, symbol: String) -> StdResult<FreezeStatusResponse> {
    let all_tokens_frozen = ALL_TOKENS_FROZEN
        .may_load(deps.storage)?
        .unwrap_or(false);
    let token_frozen = FROZEN_TOKENS.has(deps.storage, &symbol);
    Ok(FreezeStatusResponse {
        symbol,
        token_frozen,
        all_tokens_frozen,
    })
}

// ============================================================================
// Approval Ledger Queries
// ============================================================================

pub fn query_is_contract_call_approved(
    deps: Deps,
    source_chain: String,
    source_address: String,
    contract_address: String,
    payload_hash: HexBinary,
) -> StdResult<ApprovalResponse> {
    Ok(ApprovalResponse {
        approved: is_contract_call_approved(
            deps,
            &source_chain,
            &source_address,
            &contract_address,
            &payload_hash,
        )?,
    })
}

pub fn query_is_contract_call_and_mint_approved(
    deps: Deps,
    source_chain: String,
    source_address: String,
    contract_address: String,
    payload_hash: HexBinary,
    symbol: String,
    amount: Uint128,
) -> StdResult<ApprovalResponse> {
    Ok(ApprovalResponse {
        approved: is_contract_call_and_mint_approved(
            deps,
            &source_chain,
            &source_address,
            &contract_address,
            &payload_hash,
            &symbol,
            amount,
        )?,
    })
}
