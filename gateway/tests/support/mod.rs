//! Shared cw-multi-test setup: signers, gateway instances, cw20 tokens and
//! the destination/swap test doubles.

#![allow(dead_code)]

use cosmwasm_std::{from_json, to_json_binary, Addr, Binary, Event, HexBinary, Uint128};
use cw20::{BalanceResponse, Cw20Coin, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{
    App, AppBuilder, AppResponse, BankKeeper, ContractWrapper, Executor, MockAddressGenerator,
    MockApiBech32, WasmKeeper,
};
use k256::ecdsa::SigningKey;
use serde::Serialize;

use gateway::command::{
    CommandBatch, DeployTokenParams, FreezeTokenParams, MintTokenParams, RawCommand,
};
use gateway::msg::{
    CommandOutcome, ExecuteBatchResponse, ExecuteMsg, InstantiateMsg, QueryMsg, SignerSetMsg,
    TokenAddressResponse,
};
use gateway::{batch_signing_hash, keccak256};

pub type TestApp = App<BankKeeper, MockApiBech32>;

pub const OWNER_ROLE: u8 = 1;
pub const OPERATOR_ROLE: u8 = 2;
pub const THRESHOLD: u32 = 2;

// ============================================================================
// Signers
// ============================================================================

/// secp256k1 key with its Ethereum address.
pub struct TestSigner {
    key: SigningKey,
    pub address: [u8; 20],
}

impl TestSigner {
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).unwrap();
        let point = key.verifying_key().to_encoded_point(false);
        let digest = keccak256(&point.as_bytes()[1..]);
        let mut address = [0u8; 20];
        address.copy_from_slice(&digest[12..]);
        Self { key, address }
    }

    pub fn member(&self) -> HexBinary {
        HexBinary::from(self.address.to_vec())
    }

    /// `r || s || v` over the batch signing hash, with `v` in {27, 28}.
    pub fn sign(&self, data: &[u8]) -> Binary {
        let hash = batch_signing_hash(data);
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(&hash).unwrap();
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(27 + recovery_id.to_byte());
        Binary::from(bytes)
    }
}

pub fn sign_all(signers: &[&TestSigner], data: &[u8]) -> Vec<Binary> {
    signers.iter().map(|signer| signer.sign(data)).collect()
}

// ============================================================================
// Commands
// ============================================================================

pub fn command_id(label: &str) -> HexBinary {
    HexBinary::from(keccak256(label.as_bytes()).to_vec())
}

pub fn raw_command(label: &str, name: &str, params: &impl Serialize) -> RawCommand {
    RawCommand {
        id: command_id(label),
        name: name.to_string(),
        params: to_json_binary(params).unwrap(),
    }
}

pub fn deploy_token_cmd(
    label: &str,
    symbol: &str,
    decimals: u8,
    cap: u128,
    token_address: Option<&Addr>,
) -> RawCommand {
    raw_command(
        label,
        "deployToken",
        &DeployTokenParams {
            name: format!("{} Token", symbol),
            symbol: symbol.to_string(),
            decimals,
            cap: Uint128::new(cap),
            token_address: token_address.map(|a| a.to_string()),
        },
    )
}

pub fn mint_token_cmd(label: &str, symbol: &str, recipient: &Addr, amount: u128) -> RawCommand {
    raw_command(
        label,
        "mintToken",
        &MintTokenParams {
            symbol: symbol.to_string(),
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        },
    )
}

pub fn symbol_cmd(label: &str, name: &str, symbol: &str) -> RawCommand {
    raw_command(
        label,
        name,
        &FreezeTokenParams {
            symbol: symbol.to_string(),
        },
    )
}

pub fn batch_data(chain_id: u64, role: u8, commands: Vec<RawCommand>) -> Binary {
    to_json_binary(&CommandBatch {
        chain_id,
        role: role.into(),
        commands,
    })
    .unwrap()
}

pub fn outcomes(res: &AppResponse) -> Vec<CommandOutcome> {
    let data: ExecuteBatchResponse = from_json(res.data.as_ref().unwrap()).unwrap();
    data.outcomes
}

// ============================================================================
// Events
// ============================================================================

pub fn wasm_events<'a>(res: &'a AppResponse, ty: &str) -> Vec<&'a Event> {
    let ty = format!("wasm-{}", ty);
    res.events.iter().filter(|e| e.ty == ty).collect()
}

pub fn attr(event: &Event, key: &str) -> String {
    event
        .attributes
        .iter()
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_else(|| panic!("attribute {} missing on {}", key, event.ty))
}

pub fn top_attr(res: &AppResponse, key: &str) -> String {
    let wasm = res.events.iter().find(|e| e.ty == "wasm").unwrap();
    attr(wasm, key)
}

// ============================================================================
// Suite
// ============================================================================

pub struct Gateway {
    pub addr: Addr,
    pub chain_id: u64,
    pub owners: Vec<TestSigner>,
    pub operators: Vec<TestSigner>,
}

impl Gateway {
    pub fn signers(&self, role: u8) -> &[TestSigner] {
        match role {
            OWNER_ROLE => &self.owners,
            _ => &self.operators,
        }
    }
}

pub struct Suite {
    pub app: TestApp,
    pub admin: Addr,
    pub gateway_code_id: u64,
    pub token_code_id: u64,
    pub destination_code_id: u64,
    pub swapper_code_id: u64,
}

impl Suite {
    pub fn new() -> Self {
        // Contract addresses must be bech32 too, including Instantiate2 ones.
        let mut app = AppBuilder::new()
            .with_api(MockApiBech32::new("terra"))
            .with_wasm(WasmKeeper::new().with_address_generator(MockAddressGenerator))
            .build(|_, _, _| {});

        let gateway_code_id = app.store_code(Box::new(
            ContractWrapper::new(
                gateway::contract::execute,
                gateway::contract::instantiate,
                gateway::contract::query,
            )
            .with_reply(gateway::contract::reply),
        ));
        let token_code_id = app.store_code(Box::new(ContractWrapper::new(
            cw20_base::contract::execute,
            cw20_base::contract::instantiate,
            cw20_base::contract::query,
        )));
        let destination_code_id = app.store_code(Box::new(
            ContractWrapper::new(
                destination::execute,
                destination::instantiate,
                destination::query,
            )
            .with_reply(destination::reply),
        ));
        let swapper_code_id = app.store_code(Box::new(ContractWrapper::new(
            swapper::execute,
            swapper::instantiate,
            swapper::query,
        )));

        let admin = app.api().addr_make("admin");
        Self {
            app,
            admin,
            gateway_code_id,
            token_code_id,
            destination_code_id,
            swapper_code_id,
        }
    }

    pub fn addr(&self, name: &str) -> Addr {
        self.app.api().addr_make(name)
    }

    /// Gateway with 2-of-3 owner and 2-of-3 operator signers.
    pub fn instantiate_gateway(&mut self, chain_id: u64) -> Gateway {
        let base = (chain_id as u8) * 10;
        let owners: Vec<TestSigner> = (1..=3).map(|i| TestSigner::new(base + i)).collect();
        let operators: Vec<TestSigner> = (4..=6).map(|i| TestSigner::new(base + i)).collect();

        let addr = self
            .app
            .instantiate_contract(
                self.gateway_code_id,
                self.admin.clone(),
                &InstantiateMsg {
                    admin: self.admin.to_string(),
                    chain_id,
                    token_code_id: self.token_code_id,
                    owner_signers: SignerSetMsg {
                        members: owners.iter().map(TestSigner::member).collect(),
                        threshold: THRESHOLD,
                    },
                    operator_signers: SignerSetMsg {
                        members: operators.iter().map(TestSigner::member).collect(),
                        threshold: THRESHOLD,
                    },
                },
                &[],
                format!("gateway-{}", chain_id),
                Some(self.admin.to_string()),
            )
            .unwrap();

        Gateway {
            addr,
            chain_id,
            owners,
            operators,
        }
    }

    pub fn submit(
        &mut self,
        gateway: &Gateway,
        data: Binary,
        signatures: Vec<Binary>,
    ) -> anyhow::Result<AppResponse> {
        let relayer = self.addr("relayer");
        self.app.execute_contract(
            relayer,
            gateway.addr.clone(),
            &ExecuteMsg::Execute { data, signatures },
            &[],
        )
    }

    /// Sign with exactly `THRESHOLD` signers of `role` and submit.
    pub fn execute_batch(
        &mut self,
        gateway: &Gateway,
        role: u8,
        commands: Vec<RawCommand>,
    ) -> anyhow::Result<AppResponse> {
        let data = batch_data(gateway.chain_id, role, commands);
        let signers: Vec<&TestSigner> = gateway
            .signers(role)
            .iter()
            .take(THRESHOLD as usize)
            .collect();
        let signatures = sign_all(&signers, data.as_slice());
        self.submit(gateway, data, signatures)
    }

    pub fn token_address(&self, gateway: &Gateway, symbol: &str) -> Addr {
        let res: TokenAddressResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &gateway.addr,
                &QueryMsg::TokenAddress {
                    symbol: symbol.to_string(),
                },
            )
            .unwrap();
        res.address
    }

    pub fn balance(&self, token: &Addr, owner: &Addr) -> Uint128 {
        let res: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                token,
                &Cw20QueryMsg::Balance {
                    address: owner.to_string(),
                },
            )
            .unwrap();
        res.balance
    }

    /// A cw20 token created outside any gateway.
    pub fn instantiate_cw20(&mut self, symbol: &str, holders: &[(&Addr, u128)]) -> Addr {
        let creator = self.addr("token_creator");
        self.app
            .instantiate_contract(
                self.token_code_id,
                creator.clone(),
                &cw20_base::msg::InstantiateMsg {
                    name: format!("{} Token", symbol),
                    symbol: symbol.to_string(),
                    decimals: 6,
                    initial_balances: holders
                        .iter()
                        .map(|(address, amount)| Cw20Coin {
                            address: address.to_string(),
                            amount: Uint128::new(*amount),
                        })
                        .collect(),
                    mint: Some(MinterResponse {
                        minter: creator.to_string(),
                        cap: None,
                    }),
                    marketing: None,
                },
                &[],
                symbol.to_string(),
                None,
            )
            .unwrap()
    }

    pub fn instantiate_swapper(&mut self, counter_asset: &Addr) -> Addr {
        let admin = self.admin.clone();
        self.app
            .instantiate_contract(
                self.swapper_code_id,
                admin,
                &swapper::InstantiateMsg {
                    counter_asset: counter_asset.to_string(),
                },
                &[],
                "swapper",
                None,
            )
            .unwrap()
    }

    pub fn instantiate_destination(&mut self, gateway: &Gateway, swapper: &Addr) -> Addr {
        let admin = self.admin.clone();
        self.app
            .instantiate_contract(
                self.destination_code_id,
                admin,
                &destination::InstantiateMsg {
                    gateway: gateway.addr.to_string(),
                    swapper: swapper.to_string(),
                },
                &[],
                "destination",
                None,
            )
            .unwrap()
    }
}

// ============================================================================
// Destination Contract Test Double
// ============================================================================

/// Receives approved calls, consumes them on the gateway and forwards any
/// delivered tokens into a swap. A failed swap is caught so the delivered
/// tokens stay with this contract.
pub mod destination {
    use common::{ExecutableMsg, GatewayValidateMsg};
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, HexBinary, MessageInfo, Reply, Response,
        StdError, StdResult, SubMsg, WasmMsg,
    };
    use cw_storage_plus::Item;

    use gateway::keccak256;
    use gateway::msg::{ApprovalResponse, QueryMsg as GatewayQueryMsg};

    const GATEWAY: Item<Addr> = Item::new("gateway");
    const SWAPPER: Item<Addr> = Item::new("swapper");
    const LAST_PAYLOAD: Item<Binary> = Item::new("last_payload");
    const SWAP_FAILED: Item<bool> = Item::new("swap_failed");

    const SWAP_REPLY_ID: u64 = 1;

    #[cw_serde]
    pub struct InstantiateMsg {
        pub gateway: String,
        pub swapper: String,
    }

    #[cw_serde]
    pub enum QueryMsg {
        State {},
    }

    #[cw_serde]
    pub struct StateResponse {
        pub last_payload: Option<Binary>,
        pub swap_failed: bool,
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        GATEWAY.save(deps.storage, &deps.api.addr_validate(&msg.gateway)?)?;
        SWAPPER.save(deps.storage, &deps.api.addr_validate(&msg.swapper)?)?;
        SWAP_FAILED.save(deps.storage, &false)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        env: Env,
        _info: MessageInfo,
        msg: ExecutableMsg,
    ) -> StdResult<Response> {
        let gateway = GATEWAY.load(deps.storage)?;
        match msg {
            ExecutableMsg::Execute {
                source_chain,
                source_address,
                payload,
                ..
            } => {
                let payload_hash = HexBinary::from(keccak256(payload.as_slice()).to_vec());
                let approval: ApprovalResponse = deps.querier.query_wasm_smart(
                    &gateway,
                    &GatewayQueryMsg::IsContractCallApproved {
                        source_chain: source_chain.clone(),
                        source_address: source_address.clone(),
                        contract_address: env.contract.address.to_string(),
                        payload_hash: payload_hash.clone(),
                    },
                )?;
                if !approval.approved {
                    return Err(StdError::generic_err("not approved by gateway"));
                }
                LAST_PAYLOAD.save(deps.storage, &payload)?;

                Ok(Response::new().add_message(WasmMsg::Execute {
                    contract_addr: gateway.to_string(),
                    msg: to_json_binary(&GatewayValidateMsg::ValidateContractCall {
                        source_chain,
                        source_address,
                        payload_hash,
                    })?,
                    funds: vec![],
                }))
            }
            ExecutableMsg::ExecuteWithToken {
                source_chain,
                source_address,
                payload,
                symbol,
                amount,
                ..
            } => {
                let payload_hash = HexBinary::from(keccak256(payload.as_slice()).to_vec());
                let approval: ApprovalResponse = deps.querier.query_wasm_smart(
                    &gateway,
                    &GatewayQueryMsg::IsContractCallAndMintApproved {
                        source_chain: source_chain.clone(),
                        source_address: source_address.clone(),
                        contract_address: env.contract.address.to_string(),
                        payload_hash: payload_hash.clone(),
                        symbol: symbol.clone(),
                        amount,
                    },
                )?;
                if !approval.approved {
                    return Err(StdError::generic_err("not approved by gateway"));
                }
                LAST_PAYLOAD.save(deps.storage, &payload)?;

                let swapper = SWAPPER.load(deps.storage)?;
                Ok(Response::new()
                    .add_message(WasmMsg::Execute {
                        contract_addr: gateway.to_string(),
                        msg: to_json_binary(&GatewayValidateMsg::ValidateContractCallAndMint {
                            source_chain,
                            source_address,
                            payload_hash,
                            symbol,
                            amount,
                        })?,
                        funds: vec![],
                    })
                    .add_submessage(SubMsg::reply_on_error(
                        WasmMsg::Execute {
                            contract_addr: swapper.to_string(),
                            msg: to_json_binary(&super::swapper::ExecuteMsg::Swap { amount })?,
                            funds: vec![],
                        },
                        SWAP_REPLY_ID,
                    )))
            }
        }
    }

    pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> StdResult<Response> {
        if msg.id != SWAP_REPLY_ID {
            return Err(StdError::generic_err("unexpected reply"));
        }
        SWAP_FAILED.save(deps.storage, &true)?;
        Ok(Response::new().add_attribute("swap", "failed"))
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::State {} => to_json_binary(&StateResponse {
                last_payload: LAST_PAYLOAD.may_load(deps.storage)?,
                swap_failed: SWAP_FAILED.load(deps.storage)?,
            }),
        }
    }
}

// ============================================================================
// Swap Contract Test Double
// ============================================================================

/// Swaps need twice the incoming amount of the counter-asset in the pool.
pub mod swapper {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Empty, Env, MessageInfo, Response, StdError,
        StdResult, Uint128,
    };
    use cw20::{BalanceResponse, Cw20QueryMsg};
    use cw_storage_plus::Item;

    const COUNTER_ASSET: Item<Addr> = Item::new("counter_asset");

    #[cw_serde]
    pub struct InstantiateMsg {
        pub counter_asset: String,
    }

    #[cw_serde]
    pub enum ExecuteMsg {
        Swap { amount: Uint128 },
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        COUNTER_ASSET.save(deps.storage, &deps.api.addr_validate(&msg.counter_asset)?)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        env: Env,
        _info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Swap { amount } => {
                let counter_asset = COUNTER_ASSET.load(deps.storage)?;
                let pool: BalanceResponse = deps.querier.query_wasm_smart(
                    &counter_asset,
                    &Cw20QueryMsg::Balance {
                        address: env.contract.address.to_string(),
                    },
                )?;
                let required = amount.checked_mul(Uint128::new(2))?;
                if pool.balance < required {
                    return Err(StdError::generic_err(format!(
                        "insufficient counter-asset liquidity: have {}, need {}",
                        pool.balance, required
                    )));
                }
                Ok(Response::new().add_attribute("swap", "done"))
            }
        }
    }

    pub fn query(_deps: Deps, _env: Env, _msg: Empty) -> StdResult<Binary> {
        to_json_binary(&Empty {})
    }
}
