use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use anchor_spl::token::{self, TransferChecked};

use crate::errors::RaffleError;
use crate::events::{RaffleCancelled, RaffleFinished};
use crate::state::{Raffle, Role};
use crate::utils::{
    assert_ed25519_ix_matches, expected_seed_msg, find_ticket_address, select_winning_index,
    RAFFLE_SEED,
};
use crate::{CancelRaffle, FinishRaffle};

/// Ticket id drawn for `seed`. Fails on finished or empty raffles.
pub fn draw_winner(raffle: &Raffle, seed: &[u8; 32]) -> Result<u64> {
    let total = raffle.settleable_tickets()?;
    select_winning_index(seed, raffle.raffle_id, total)
}

// Tx layout must be: [ ed25519_verify(oracle, seed msg), finish_raffle ]
pub fn finish_raffle(ctx: Context<FinishRaffle>, raffle_id: u64, seed: [u8; 32]) -> Result<()> {
    let factory = &ctx.accounts.factory;
    factory.require_role(Role::Manager, &ctx.accounts.manager.key())?;
    factory.require_known_raffle(raffle_id)?;

    let raffle = Raffle::load(&ctx.accounts.raffle)?;
    let total = raffle.settleable_tickets()?;
    require!(factory.oracle_pubkey != Pubkey::default(), RaffleError::OracleNotSet);

    // --- ed25519 introspection ---
    let ix_sys = ctx.accounts.instructions.to_account_info();
    let current_ix = load_current_index_checked(&ix_sys)? as usize;
    require!(current_ix >= 1, RaffleError::MissingOrInvalidEd25519Ix);

    let ed_ix = load_instruction_at_checked(current_ix - 1, &ix_sys)
        .map_err(|_| error!(RaffleError::MissingOrInvalidEd25519Ix))?;

    let expected = expected_seed_msg(ctx.program_id, raffle_id, total, &seed);
    assert_ed25519_ix_matches(&ed_ix, &factory.oracle_pubkey, expected.as_slice())?;

    let program_id = ctx.program_id;
    settle(ctx.accounts, program_id, raffle, &seed)
}

/// Settlement with a manager-supplied seed. Localnet only.
#[cfg(feature = "mock-seed")]
pub fn finish_raffle_mock(ctx: Context<FinishRaffle>, raffle_id: u64, seed: [u8; 32]) -> Result<()> {
    let factory = &ctx.accounts.factory;
    factory.require_role(Role::Manager, &ctx.accounts.manager.key())?;
    factory.require_known_raffle(raffle_id)?;

    let raffle = Raffle::load(&ctx.accounts.raffle)?;
    let program_id = ctx.program_id;
    settle(ctx.accounts, program_id, raffle, &seed)
}

fn settle(accounts: &mut FinishRaffle<'_>, program_id: &Pubkey, mut raffle: Raffle, seed: &[u8; 32]) -> Result<()> {
    require_keys_eq!(accounts.prize_mint.key(), raffle.prize_mint, RaffleError::PrizeMintMismatch);

    let raffle_key = accounts.raffle.key();
    let ticket_id = draw_winner(&raffle, seed)?;

    // the drawn ticket's *current* holder wins
    let ticket = &accounts.winning_ticket;
    let (expected_ticket, _) = find_ticket_address(program_id, &raffle_key, ticket_id);
    require_keys_eq!(expected_ticket, ticket.key(), RaffleError::WinningTicketMismatch);
    require_keys_eq!(ticket.raffle, raffle_key, RaffleError::RaffleMismatch);

    let winner = ticket.holder;
    require_keys_eq!(
        accounts.winner_token_account.owner,
        winner,
        RaffleError::WinnerAccountMismatch
    );

    // commit state before the payout CPI
    let now = Clock::get()?.unix_timestamp;
    raffle.record_winner(ticket_id, winner, now)?;
    raffle.store(&accounts.raffle)?;

    let raffle_id = raffle.raffle_id;
    let amount = raffle.prize_amount;
    let raffle_le = raffle_id.to_le_bytes();
    let bump = raffle.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[RAFFLE_SEED, &raffle_le, &[bump]]];

    token::transfer_checked(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            TransferChecked {
                from: accounts.prize_vault.to_account_info(),
                mint: accounts.prize_mint.to_account_info(),
                to: accounts.winner_token_account.to_account_info(),
                authority: accounts.raffle.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        accounts.prize_mint.decimals,
    )?;

    emit!(RaffleFinished {
        raffle_id,
        winner,
        amount,
        ticket_id,
    });
    msg!("Raffle {} finished: ticket {} -> {}", raffle_id, ticket_id, winner);

    Ok(())
}

/// Refunds a raffle nobody entered to its creator and closes it.
pub fn cancel_raffle(ctx: Context<CancelRaffle>, raffle_id: u64) -> Result<()> {
    let factory = &ctx.accounts.factory;
    factory.require_role(Role::Manager, &ctx.accounts.manager.key())?;
    factory.require_known_raffle(raffle_id)?;

    let mut raffle = Raffle::load(&ctx.accounts.raffle)?;
    require_keys_eq!(ctx.accounts.prize_mint.key(), raffle.prize_mint, RaffleError::PrizeMintMismatch);
    require_keys_eq!(
        ctx.accounts.refund_account.owner,
        raffle.created_by,
        RaffleError::InvalidRecipient
    );

    let now = Clock::get()?.unix_timestamp;
    raffle.record_cancel(now)?;
    raffle.store(&ctx.accounts.raffle)?;

    let amount = raffle.prize_amount;
    let refunded_to = raffle.created_by;
    let raffle_le = raffle_id.to_le_bytes();
    let bump = raffle.bump;
    let signer_seeds: &[&[&[u8]]] = &[&[RAFFLE_SEED, &raffle_le, &[bump]]];

    token::transfer_checked(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.prize_vault.to_account_info(),
                mint: ctx.accounts.prize_mint.to_account_info(),
                to: ctx.accounts.refund_account.to_account_info(),
                authority: ctx.accounts.raffle.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        ctx.accounts.prize_mint.decimals,
    )?;

    emit!(RaffleCancelled {
        raffle_id,
        refunded_to,
        amount,
    });

    Ok(())
}
