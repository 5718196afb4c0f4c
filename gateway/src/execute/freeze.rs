//! Freeze commands and the freeze gate.
//!
//! Freezes only gate mints, validate-with-mint and outgoing token calls. They
//! do not touch balances and stay in place until explicitly lifted.

use cosmwasm_std::{Binary, DepsMut, Env, Event, HexBinary, StdResult, Storage};

use super::CommandEffect;
use crate::command::{decode_params, CommandKind, FreezeTokenParams};
use crate::error::ContractError;
use crate::state::{ALL_TOKENS_FROZEN, FROZEN_TOKENS};

/// Whether `symbol` is frozen, individually or through the global switch.
pub fn is_frozen(storage: &dyn Storage, symbol: &str) -> StdResult<bool> {
    Ok(ALL_TOKENS_FROZEN.may_load(storage)?.unwrap_or(false)
        || FROZEN_TOKENS.has(storage, symbol))
}

pub fn ensure_not_frozen(storage: &dyn Storage, symbol: &str) -> Result<(), ContractError> {
    if is_frozen(storage, symbol)? {
        return Err(ContractError::TokenFrozen {
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}

pub fn freeze_token(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let params: FreezeTokenParams = decode_params(CommandKind::FreezeToken, params)?;
    FROZEN_TOKENS.save(deps.storage, &params.symbol, &true)?;

    Ok(CommandEffect::done(vec![Event::new("token_frozen")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("symbol", params.symbol)]))
}

pub fn unfreeze_token(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let params: FreezeTokenParams = decode_params(CommandKind::UnfreezeToken, params)?;
    FROZEN_TOKENS.remove(deps.storage, &params.symbol);

    Ok(CommandEffect::done(vec![Event::new("token_unfrozen")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("symbol", params.symbol)]))
}

pub fn freeze_all_tokens(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    _params: &Binary,
) -> Result<CommandEffect, ContractError> {
    ALL_TOKENS_FROZEN.save(deps.storage, &true)?;

    Ok(CommandEffect::done(vec![Event::new("all_tokens_frozen")
        .add_attribute("command_id", command_id.to_hex())]))
}

pub fn unfreeze_all_tokens(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    _params: &Binary,
) -> Result<CommandEffect, ContractError> {
    ALL_TOKENS_FROZEN.save(deps.storage, &false)?;

    Ok(CommandEffect::done(vec![Event::new("all_tokens_unfrozen")
        .add_attribute("command_id", command_id.to_hex())]))
}
