use anchor_lang::prelude::*;
use anchor_spl::token::{self, TransferChecked};

use crate::constants::CURRENT_VERSION;
use crate::events::RaffleCreated;
use crate::state::{Raffle, Role};
use crate::utils::{check_funding, find_raffle_address, CreatedRaffle, FundingSource};
use crate::{CreateRaffle, FactoryView};

/// Creates raffle `factory.raffles_count` and pulls `amount` of the prize mint into its vault.
pub fn create_raffle(
    ctx: Context<CreateRaffle>,
    name: String,
    symbol: String,
    token_uri: String,
    amount: u64,
) -> Result<CreatedRaffle> {
    let manager = ctx.accounts.manager.key();
    ctx.accounts.factory.require_role(Role::Manager, &manager)?;
    Raffle::validate_metadata(&name, &symbol, &token_uri)?;

    let funding = &ctx.accounts.funding_account;
    check_funding(
        &FundingSource {
            owner: funding.owner,
            amount: funding.amount,
            delegate: funding.delegate.into(),
            delegated_amount: funding.delegated_amount,
        },
        &manager,
        amount,
    )?;

    // --- escrow pull (the only funding event of this raffle) ---
    token::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.funding_account.to_account_info(),
                mint: ctx.accounts.prize_mint.to_account_info(),
                to: ctx.accounts.prize_vault.to_account_info(),
                authority: ctx.accounts.manager.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.prize_mint.decimals,
    )?;

    let raffle_id = ctx.accounts.factory.allocate_raffle_id()?;
    let now = Clock::get()?.unix_timestamp;

    let raffle_key = ctx.accounts.raffle.key();
    let raffle = &mut ctx.accounts.raffle;
    raffle.raffle_id = raffle_id;
    raffle.bump = ctx.bumps.raffle;
    raffle.version = CURRENT_VERSION;

    raffle.created_by = manager;
    raffle.created_at = now;

    raffle.name = name;
    raffle.symbol = symbol;
    raffle.metadata_uri = token_uri;

    raffle.prize_mint = ctx.accounts.prize_mint.key();
    raffle.prize_amount = amount;
    raffle.prize_vault = ctx.accounts.prize_vault.key();
    raffle.prize_vault_bump = ctx.bumps.prize_vault;

    raffle.next_ticket_id = 0;
    raffle.finished = false;
    raffle.finished_at = 0;
    raffle.winner = Pubkey::default();
    raffle.winning_ticket = None;

    // funded: observable raffles are always started
    raffle.started = true;

    emit!(RaffleCreated {
        raffle_id,
        raffle: raffle_key,
        created_by: manager,
        prize_mint: raffle.prize_mint,
        prize_amount: amount,
    });
    msg!("Raffle {} created at {}, prize {}", raffle_id, raffle_key, amount);

    Ok(CreatedRaffle {
        raffle_id,
        raffle: raffle_key,
    })
}

pub fn raffles_count(ctx: Context<FactoryView>) -> Result<u64> {
    Ok(ctx.accounts.factory.raffles_count)
}

pub fn raffle_address(ctx: Context<FactoryView>, raffle_id: u64) -> Result<Pubkey> {
    ctx.accounts.factory.require_known_raffle(raffle_id)?;
    Ok(find_raffle_address(ctx.program_id, raffle_id).0)
}
