//! Signed batch execution.
//!
//! A batch is rejected as a whole when it does not decode, targets another
//! chain, names an unknown role or lacks quorum. Past that point every command
//! stands on its own: a consumed id is skipped, an unknown name is skipped,
//! and a failing handler is reported without affecting its siblings.
//!
//! Handlers check before they write, so a failed handler leaves no trace.
//! Commands that need a token contract to act (native deploy, mint) dispatch
//! that message as a reply-always sub-message; if the token contract fails,
//! the reply reverses the command's writes, releases its id again and rewrites
//! the command's outcome to `Failed` in the response data.

use cosmwasm_std::{
    to_json_binary, Binary, DepsMut, Env, Event, HexBinary, Order, Reply, Response, Storage,
    SubMsg, SubMsgResult,
};

use super::approvals::{approve_contract_call, approve_contract_call_with_mint};
use super::freeze::{freeze_all_tokens, freeze_token, unfreeze_all_tokens, unfreeze_token};
use super::tokens::{deploy_token, mint_token, undo_writes};
use super::CommandEffect;
use crate::auth::{recover_signers, verify_quorum, ApiRecovery, Role};
use crate::command::{decode_batch, CommandKind};
use crate::error::ContractError;
use crate::hash::batch_signing_hash;
use crate::msg::{CommandOutcome, CommandStatus, ExecuteBatchResponse, SkipReason};
use crate::state::{
    PendingCommand, BATCH_OUTCOMES, CONFIG, EXECUTED_COMMANDS, NEXT_REPLY_ID, PENDING_COMMANDS,
    SIGNER_SETS,
};

/// Handler signature shared by every command.
pub type CommandHandler =
    fn(DepsMut, &Env, &HexBinary, &Binary) -> Result<CommandEffect, ContractError>;

/// Handler table over the command vocabulary.
pub fn handler(kind: CommandKind) -> CommandHandler {
    match kind {
        CommandKind::DeployToken => deploy_token,
        CommandKind::MintToken => mint_token,
        CommandKind::ApproveContractCall => approve_contract_call,
        CommandKind::ApproveContractCallWithMint => approve_contract_call_with_mint,
        CommandKind::FreezeToken => freeze_token,
        CommandKind::UnfreezeToken => unfreeze_token,
        CommandKind::FreezeAllTokens => freeze_all_tokens,
        CommandKind::UnfreezeAllTokens => unfreeze_all_tokens,
    }
}

fn command_executed_event(command_id: &HexBinary, command: &str) -> Event {
    Event::new("command_executed")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("command", command)
}

fn command_failed_event(command_id: &HexBinary, command: &str, reason: &str) -> Event {
    Event::new("command_failed")
        .add_attribute("command_id", command_id.to_hex())
        .add_attribute("command", command)
        .add_attribute("reason", reason)
}

/// Applied, skipped and failed counts of a batch.
fn outcome_counts(outcomes: &[CommandOutcome]) -> (u32, u32, u32) {
    outcomes
        .iter()
        .fold((0, 0, 0), |(applied, skipped, failed), outcome| match outcome.status {
            CommandStatus::Applied => (applied + 1, skipped, failed),
            CommandStatus::Skipped { .. } => (applied, skipped + 1, failed),
            CommandStatus::Failed { .. } => (applied, skipped, failed + 1),
        })
}

fn next_reply_id(storage: &mut dyn Storage) -> Result<u64, ContractError> {
    let id = NEXT_REPLY_ID.may_load(storage)?.unwrap_or_default();
    NEXT_REPLY_ID.save(storage, &id.wrapping_add(1))?;
    Ok(id)
}

/// Execute a signed command batch.
pub fn execute_batch(
    mut deps: DepsMut,
    env: Env,
    data: Binary,
    signatures: Vec<Binary>,
) -> Result<Response, ContractError> {
    let batch = decode_batch(data.as_slice())?;

    let config = CONFIG.load(deps.storage)?;
    if batch.chain_id != config.chain_id {
        return Err(ContractError::InvalidChainId {
            expected: config.chain_id,
            got: batch.chain_id,
        });
    }

    let role = Role::from_value(batch.role)?;
    let signer_set = SIGNER_SETS.load(deps.storage, role.as_u8())?;
    let signing_hash = batch_signing_hash(data.as_slice());
    let recovered = recover_signers(&ApiRecovery::new(deps.api), &signing_hash, &signatures);
    let signers = verify_quorum(role, &signer_set, &recovered)?;

    let mut response = Response::new();
    let mut outcomes: Vec<CommandOutcome> = Vec::with_capacity(batch.commands.len());
    let mut awaiting_reply = false;

    for command in batch.commands {
        let status = if EXECUTED_COMMANDS.has(deps.storage, command.id.as_slice()) {
            CommandStatus::Skipped {
                reason: SkipReason::AlreadyExecuted,
            }
        } else if let Some(kind) = CommandKind::from_name(&command.name) {
            match handler(kind)(deps.branch(), &env, &command.id, &command.params) {
                Ok(effect) => {
                    EXECUTED_COMMANDS.save(deps.storage, command.id.as_slice(), &true)?;
                    match effect.token_msg {
                        None => {
                            response = response
                                .add_events(effect.events)
                                .add_event(command_executed_event(&command.id, kind.name()));
                        }
                        Some((msg, undo)) => {
                            let reply_id = next_reply_id(deps.storage)?;
                            PENDING_COMMANDS.save(
                                deps.storage,
                                reply_id,
                                &PendingCommand {
                                    command_id: command.id.clone(),
                                    command: kind.name().to_string(),
                                    outcome_index: outcomes.len() as u32,
                                    undo,
                                    events: effect.events,
                                },
                            )?;
                            response = response.add_submessage(SubMsg::reply_always(msg, reply_id));
                            awaiting_reply = true;
                        }
                    }
                    CommandStatus::Applied
                }
                Err(err) => {
                    let reason = err.to_string();
                    response =
                        response.add_event(command_failed_event(&command.id, kind.name(), &reason));
                    CommandStatus::Failed { reason }
                }
            }
        } else {
            CommandStatus::Skipped {
                reason: SkipReason::UnknownCommand,
            }
        };

        outcomes.push(CommandOutcome {
            command_id: command.id,
            status,
        });
    }

    if awaiting_reply {
        BATCH_OUTCOMES.save(deps.storage, &outcomes)?;
    }

    let (applied, skipped, failed) = outcome_counts(&outcomes);
    Ok(response
        .add_attribute("method", "execute")
        .add_attribute("role", role.as_str())
        .add_attribute("signers", signers.to_string())
        .add_attribute("applied", applied.to_string())
        .add_attribute("skipped", skipped.to_string())
        .add_attribute("failed", failed.to_string())
        .set_data(to_json_binary(&ExecuteBatchResponse { outcomes })?))
}

/// Settle a command whose token message has run.
///
/// Every reply returns the batch outcomes as settled so far, so the data of
/// the whole execution reflects the last reply.
pub fn handle_command_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let pending = PENDING_COMMANDS
        .may_load(deps.storage, msg.id)?
        .ok_or(ContractError::UnknownReply { id: msg.id })?;
    PENDING_COMMANDS.remove(deps.storage, msg.id);
    let mut outcomes = BATCH_OUTCOMES.may_load(deps.storage)?;

    let mut response = Response::new().add_attribute("method", "command_reply");
    match msg.result {
        SubMsgResult::Ok(_) => {
            response = response
                .add_attribute("outcome", "executed")
                .add_events(pending.events)
                .add_event(command_executed_event(&pending.command_id, &pending.command));
        }
        SubMsgResult::Err(reason) => {
            undo_writes(deps.storage, &pending.undo)?;
            EXECUTED_COMMANDS.remove(deps.storage, pending.command_id.as_slice());
            if let Some(outcome) = outcomes
                .as_mut()
                .and_then(|outcomes| outcomes.get_mut(pending.outcome_index as usize))
            {
                outcome.status = CommandStatus::Failed {
                    reason: reason.clone(),
                };
            }
            response = response
                .add_attribute("outcome", "failed")
                .add_event(command_failed_event(
                    &pending.command_id,
                    &pending.command,
                    &reason,
                ));
        }
    }

    let Some(outcomes) = outcomes else {
        return Ok(response);
    };
    if PENDING_COMMANDS
        .keys(deps.storage, None, None, Order::Ascending)
        .next()
        .is_none()
    {
        BATCH_OUTCOMES.remove(deps.storage);
    } else {
        BATCH_OUTCOMES.save(deps.storage, &outcomes)?;
    }

    let (applied, skipped, failed) = outcome_counts(&outcomes);
    Ok(response
        .add_attribute("applied", applied.to_string())
        .add_attribute("skipped", skipped.to_string())
        .add_attribute("failed", failed.to_string())
        .set_data(to_json_binary(&ExecuteBatchResponse { outcomes })?))
}
