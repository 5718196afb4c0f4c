//! Gateway Contract - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
    StdResult,
};
use cw2::set_contract_version;

use crate::auth::{validate_signer_set, Role};
use crate::error::ContractError;
use crate::execute::{
    execute_batch, execute_call_contract, execute_call_contract_with_token,
    execute_rotate_signers, execute_update_admin, execute_validate_contract_call,
    execute_validate_contract_call_and_mint, handle_command_reply,
};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query::{
    query_config, query_freeze_status, query_is_command_executed,
    query_is_contract_call_and_mint_approved, query_is_contract_call_approved,
    query_predict_token_address, query_signers, query_token, query_token_address, query_tokens,
};
use crate::state::{
    Config, ALL_TOKENS_FROZEN, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, NEXT_REPLY_ID,
    SIGNER_SETS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let owner_signers =
        validate_signer_set(msg.owner_signers.members, msg.owner_signers.threshold)?;
    let operator_signers =
        validate_signer_set(msg.operator_signers.members, msg.operator_signers.threshold)?;

    let config = Config {
        admin,
        chain_id: msg.chain_id,
        token_code_id: msg.token_code_id,
    };
    CONFIG.save(deps.storage, &config)?;
    SIGNER_SETS.save(deps.storage, Role::Owner.as_u8(), &owner_signers)?;
    SIGNER_SETS.save(deps.storage, Role::Operator.as_u8(), &operator_signers)?;
    ALL_TOKENS_FROZEN.save(deps.storage, &false)?;
    NEXT_REPLY_ID.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("chain_id", config.chain_id.to_string())
        .add_attribute("token_code_id", config.token_code_id.to_string())
        .add_attribute("owner_threshold", owner_signers.threshold.to_string())
        .add_attribute("operator_threshold", operator_signers.threshold.to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Signed command batches
        ExecuteMsg::Execute { data, signatures } => execute_batch(deps, env, data, signatures),

        // Outgoing calls
        ExecuteMsg::CallContract {
            destination_chain,
            destination_address,
            payload,
        } => execute_call_contract(deps, info, destination_chain, destination_address, payload),
        ExecuteMsg::CallContractWithToken {
            destination_chain,
            destination_address,
            payload,
            symbol,
            amount,
        } => execute_call_contract_with_token(
            deps,
            env,
            info,
            destination_chain,
            destination_address,
            payload,
            symbol,
            amount,
        ),

        // Approval consumption
        ExecuteMsg::ValidateContractCall {
            source_chain,
            source_address,
            payload_hash,
        } => execute_validate_contract_call(deps, info, source_chain, source_address, payload_hash),
        ExecuteMsg::ValidateContractCallAndMint {
            source_chain,
            source_address,
            payload_hash,
            symbol,
            amount,
        } => execute_validate_contract_call_and_mint(
            deps,
            info,
            source_chain,
            source_address,
            payload_hash,
            symbol,
            amount,
        ),

        // Admin operations
        ExecuteMsg::RotateSigners {
            role,
            members,
            threshold,
        } => execute_rotate_signers(deps, info, role, members, threshold),
        ExecuteMsg::UpdateAdmin { new_admin } => execute_update_admin(deps, info, new_admin),
    }
}

// ============================================================================
// Reply
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    handle_command_reply(deps, msg)
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Signers { role } => to_json_binary(&query_signers(deps, role)?),
        QueryMsg::IsCommandExecuted { command_id } => {
            to_json_binary(&query_is_command_executed(deps, command_id)?)
        }

        // Token registry queries
        QueryMsg::Token { symbol } => to_json_binary(&query_token(deps, symbol)?),
        QueryMsg::Tokens { start_after, limit } => {
            to_json_binary(&query_tokens(deps, start_after, limit)?)
        }
        QueryMsg::TokenAddress { symbol } => to_json_binary(&query_token_address(deps, symbol)?),
        QueryMsg::PredictTokenAddress {
            symbol,
            decimals,
            cap,
        } => to_json_binary(&query_predict_token_address(
            deps, env, symbol, decimals, cap,
        )?),
        QueryMsg::FreezeStatus { symbol } => to_json_binary(&query_freeze_status(deps, symbol)?),

        // Approval ledger queries
        QueryMsg::IsContractCallApproved {
            source_chain,
            source_address,
            contract_address,
            payload_hash,
        } => to_json_binary(&query_is_contract_call_approved(
            deps,
            source_chain,
            source_address,
            contract_address,
            payload_hash,
        )?),
        QueryMsg::IsContractCallAndMintApproved {
            source_chain,
            source_address,
            contract_address,
            payload_hash,
            symbol,
            amount,
        } => to_json_binary(&query_is_contract_call_and_mint_approved(
            deps,
            source_chain,
            source_address,
            contract_address,
            payload_hash,
            symbol,
            amount,
        )?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if NEXT_REPLY_ID.may_load(deps.storage)?.is_none() {
        NEXT_REPLY_ID.save(deps.storage, &0u64)?;
    }

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
