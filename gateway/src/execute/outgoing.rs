//! Outgoing cross-chain calls.
//!
//! Nothing is stored locally: the emitted events are the record the relayer
//! turns into approval commands on the destination gateway. Tokens sent with
//! a call are burned (gateway-deployed) or locked in the gateway (external),
//! and there is no refund path.

use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, Event, MessageInfo, Response, Uint128, WasmMsg,
};
use cw20::{AllowanceResponse, BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg};

use super::freeze::ensure_not_frozen;
use super::tokens::load_token;
use crate::error::ContractError;
use crate::hash::{bytes32_to_hex, keccak256};
use crate::state::TOKEN_SUPPLY;

/// Record a plain contract call.
pub fn execute_call_contract(
    _deps: DepsMut,
    info: MessageInfo,
    destination_chain: String,
    destination_address: String,
    payload: Binary,
) -> Result<Response, ContractError> {
    let payload_hash = keccak256(payload.as_slice());

    Ok(Response::new()
        .add_attribute("method", "call_contract")
        .add_event(
            Event::new("contract_call")
                .add_attribute("sender", info.sender)
                .add_attribute("destination_chain", destination_chain)
                .add_attribute("destination_contract_address", destination_address)
                .add_attribute("payload_hash", bytes32_to_hex(&payload_hash))
                .add_attribute("payload", format!("0x{}", hex::encode(payload.as_slice()))),
        ))
}

/// Record a contract call that carries `amount` of `symbol` out of this chain.
#[allow(clippy::too_many_arguments)]
pub fn execute_call_contract_with_token(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    destination_chain: String,
    destination_address: String,
    payload: Binary,
    symbol: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let token = load_token(deps.storage, &symbol)?;
    ensure_not_frozen(deps.storage, &symbol)?;
    if amount.is_zero() {
        return Err(ContractError::InvalidAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }

    let balance: BalanceResponse = deps.querier.query_wasm_smart(
        &token.address,
        &Cw20QueryMsg::Balance {
            address: info.sender.to_string(),
        },
    )?;
    if balance.balance < amount {
        return Err(ContractError::InsufficientBalance {
            balance: balance.balance,
            required: amount,
        });
    }

    let allowance: AllowanceResponse = deps.querier.query_wasm_smart(
        &token.address,
        &Cw20QueryMsg::Allowance {
            owner: info.sender.to_string(),
            spender: env.contract.address.to_string(),
        },
    )?;
    let allowance = if allowance.expires.is_expired(&env.block) {
        Uint128::zero()
    } else {
        allowance.allowance
    };
    if allowance < amount {
        return Err(ContractError::InsufficientAllowance {
            allowance,
            required: amount,
        });
    }

    let token_msg = if token.is_external {
        Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: env.contract.address.to_string(),
            amount,
        }
    } else {
        if let Some(supply) = TOKEN_SUPPLY.may_load(deps.storage, &symbol)? {
            TOKEN_SUPPLY.save(deps.storage, &symbol, &supply.saturating_sub(amount))?;
        }
        Cw20ExecuteMsg::BurnFrom {
            owner: info.sender.to_string(),
            amount,
        }
    };

    let payload_hash = keccak256(payload.as_slice());

    Ok(Response::new()
        .add_message(WasmMsg::Execute {
            contract_addr: token.address.to_string(),
            msg: to_json_binary(&token_msg)?,
            funds: vec![],
        })
        .add_attribute("method", "call_contract_with_token")
        .add_event(
            Event::new("contract_call_with_token")
                .add_attribute("sender", info.sender)
                .add_attribute("destination_chain", destination_chain)
                .add_attribute("destination_contract_address", destination_address)
                .add_attribute("payload_hash", bytes32_to_hex(&payload_hash))
                .add_attribute("payload", format!("0x{}", hex::encode(payload.as_slice())))
                .add_attribute("symbol", symbol)
                .add_attribute("amount", amount),
        ))
}
