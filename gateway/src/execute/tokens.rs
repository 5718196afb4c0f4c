//! Token registry commands.
//!
//! Gateway-deployed tokens are cw20-base instances created with Instantiate2,
//! so their address is known while the command runs and a later command in
//! the same batch can already mint to it. The gateway is their only minter and
//! tracks its own minted supply to enforce the cap before emitting a mint.
//!
//! External tokens are registered as-is. The gateway holds a float of them and
//! releases from it instead of minting.

use cosmwasm_std::{
    instantiate2_address, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, Env, Event,
    HexBinary, StdError, StdResult, Storage, Uint128, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, MinterResponse};

use super::freeze::ensure_not_frozen;
use super::CommandEffect;
use crate::command::{decode_params, CommandKind, DeployTokenParams, MintTokenParams};
use crate::error::ContractError;
use crate::hash::token_salt;
use crate::state::{TokenRecord, Undo, CONFIG, TOKENS, TOKEN_SUPPLY};

// ============================================================================
// Registry Lookups
// ============================================================================

pub fn load_token(storage: &dyn Storage, symbol: &str) -> Result<TokenRecord, ContractError> {
    TOKENS
        .may_load(storage, symbol)?
        .ok_or_else(|| ContractError::UnknownSymbol {
            symbol: symbol.to_string(),
        })
}

/// Address Instantiate2 assigns to a token deployed by this gateway.
pub fn predict_token_address(
    deps: Deps,
    env: &Env,
    code_id: u64,
    salt: &[u8],
) -> StdResult<Addr> {
    let code_info = deps.querier.query_wasm_code_info(code_id)?;
    let creator = deps.api.addr_canonicalize(env.contract.address.as_str())?;
    let address = instantiate2_address(code_info.checksum.as_slice(), &creator, salt)
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    deps.api.addr_humanize(&address)
}

// ============================================================================
// deployToken
// ============================================================================

pub fn deploy_token(
    deps: DepsMut,
    env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let params: DeployTokenParams = decode_params(CommandKind::DeployToken, params)?;
    if params.symbol.is_empty() {
        return Err(ContractError::malformed(
            CommandKind::DeployToken.name(),
            "symbol must not be empty",
        ));
    }
    if TOKENS.has(deps.storage, &params.symbol) {
        return Err(ContractError::DuplicateSymbol {
            symbol: params.symbol,
        });
    }

    let external = params
        .token_address
        .as_deref()
        .filter(|address| !address.is_empty())
        .map(|address| deps.api.addr_validate(address))
        .transpose()?;

    let (address, token_msg) = match external {
        Some(address) => (address, None),
        None => {
            let config = CONFIG.load(deps.storage)?;
            let salt = token_salt(&params.symbol, params.decimals, params.cap);
            let address =
                predict_token_address(deps.as_ref(), env, config.token_code_id, &salt)?;
            let instantiate = cw20_base::msg::InstantiateMsg {
                name: params.name.clone(),
                symbol: params.symbol.clone(),
                decimals: params.decimals,
                initial_balances: vec![],
                mint: Some(MinterResponse {
                    minter: env.contract.address.to_string(),
                    cap: (!params.cap.is_zero()).then_some(params.cap),
                }),
                marketing: None,
            };
            let msg = WasmMsg::Instantiate2 {
                admin: Some(env.contract.address.to_string()),
                code_id: config.token_code_id,
                label: format!("gateway token {}", params.symbol),
                msg: to_json_binary(&instantiate)?,
                funds: vec![],
                salt: Binary::from(salt.to_vec()),
            };
            (address, Some(CosmosMsg::from(msg)))
        }
    };

    let record = TokenRecord {
        symbol: params.symbol.clone(),
        name: params.name,
        address: address.clone(),
        decimals: params.decimals,
        cap: params.cap,
        is_external: token_msg.is_none(),
    };
    TOKENS.save(deps.storage, &params.symbol, &record)?;

    let event = Event::new("token_deployed")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("symbol", &params.symbol)
        .add_attribute("token_address", address)
        .add_attribute("decimals", params.decimals.to_string())
        .add_attribute("cap", params.cap)
        .add_attribute("is_external", record.is_external.to_string());

    match token_msg {
        None => Ok(CommandEffect::done(vec![event])),
        Some(msg) => {
            TOKEN_SUPPLY.save(deps.storage, &params.symbol, &Uint128::zero())?;
            Ok(CommandEffect::pending(
                msg,
                Undo::Deploy {
                    symbol: params.symbol,
                },
                vec![event],
            ))
        }
    }
}

// ============================================================================
// mintToken
// ============================================================================

pub fn mint_token(
    deps: DepsMut,
    _env: &Env,
    command_id: &HexBinary,
    params: &Binary,
) -> Result<CommandEffect, ContractError> {
    let params: MintTokenParams = decode_params(CommandKind::MintToken, params)?;
    let recipient = deps.api.addr_validate(&params.recipient)?;
    let (token, msg) = prepare_mint(deps.storage, &params.symbol, &recipient, params.amount)?;

    let event = Event::new("token_minted")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("symbol", &token.symbol)
        .add_attribute("recipient", recipient)
        .add_attribute("amount", params.amount)
        .add_attribute("is_external", token.is_external.to_string());

    Ok(CommandEffect::pending(
        msg,
        Undo::Mint {
            symbol: token.symbol,
            amount: params.amount,
        },
        vec![event],
    ))
}

/// Check that `amount` of `symbol` may be minted to `recipient`, account for it
/// and build the token message.
///
/// Nothing is written unless every check passes. Gateway-deployed tokens are
/// minted; external tokens are transferred out of the gateway's balance.
pub fn prepare_mint(
    storage: &mut dyn Storage,
    symbol: &str,
    recipient: &Addr,
    amount: Uint128,
) -> Result<(TokenRecord, CosmosMsg), ContractError> {
    let token = load_token(storage, symbol)?;
    ensure_not_frozen(storage, symbol)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "mint amount must be greater than zero".to_string(),
        });
    }

    let msg = if token.is_external {
        Cw20ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount,
        }
    } else {
        let supply = TOKEN_SUPPLY.may_load(storage, symbol)?.unwrap_or_default();
        let new_supply = supply.checked_add(amount).map_err(StdError::from)?;
        if !token.cap.is_zero() && new_supply > token.cap {
            return Err(ContractError::CapExceeded {
                symbol: symbol.to_string(),
                cap: token.cap,
                requested: new_supply,
            });
        }
        TOKEN_SUPPLY.save(storage, symbol, &new_supply)?;
        Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        }
    };

    let msg = WasmMsg::Execute {
        contract_addr: token.address.to_string(),
        msg: to_json_binary(&msg)?,
        funds: vec![],
    };
    Ok((token, msg.into()))
}

/// Reverse the gateway-side writes of a command whose token message failed.
pub fn undo_writes(storage: &mut dyn Storage, undo: &Undo) -> StdResult<()> {
    match undo {
        Undo::Deploy { symbol } => {
            TOKENS.remove(storage, symbol);
            TOKEN_SUPPLY.remove(storage, symbol);
        }
        Undo::Mint { symbol, amount } => {
            if let Some(supply) = TOKEN_SUPPLY.may_load(storage, symbol)? {
                TOKEN_SUPPLY.save(storage, symbol, &supply.saturating_sub(*amount))?;
            }
        }
    }
    Ok(())
}
