// programs/raffle_factory/src/contexts.rs

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::errors::RaffleError;
use crate::state::{Factory, Participant, Raffle, Ticket};

// ----------------------------
// Factory / access control
// ----------------------------

#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + Factory::INIT_SPACE,
        seeds = [crate::FACTORY_SEED],
        bump
    )]
    pub factory: Account<'info, Factory>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Admin-signed factory mutations (roles, oracle).
#[derive(Accounts)]
pub struct ManageFactory<'info> {
    #[account(
        mut,
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,

    pub admin: Signer<'info>,
}

/// Read-only factory queries (answered through return data).
#[derive(Accounts)]
pub struct FactoryView<'info> {
    #[account(
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,
}

#[derive(Accounts)]
pub struct MigrateFactory<'info> {
    #[account(
        mut,
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump,
        realloc = 8 + Factory::INIT_SPACE,
        realloc::payer = admin,
        realloc::zero = false,
    )]
    pub factory: Account<'info, Factory>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

// ----------------------------
// Raffle lifecycle
// ----------------------------

#[derive(Accounts)]
pub struct CreateRaffle<'info> {
    #[account(
        mut,
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,

    #[account(
        init,
        payer = manager,
        space = 8 + Raffle::INIT_SPACE,
        seeds = [crate::RAFFLE_SEED, factory.raffles_count.to_le_bytes().as_ref()],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    pub prize_mint: Account<'info, Mint>,

    /// Escrow: token account PDA owned by the raffle PDA.
    #[account(
        init,
        payer = manager,
        seeds = [crate::PRIZE_VAULT_SEED, factory.raffles_count.to_le_bytes().as_ref()],
        bump,
        token::mint = prize_mint,
        token::authority = raffle
    )]
    pub prize_vault: Account<'info, TokenAccount>,

    /// Source of the prize: owned by the manager or delegated to it.
    #[account(
        mut,
        constraint = funding_account.mint == prize_mint.key() @ RaffleError::PrizeMintMismatch
    )]
    pub funding_account: Account<'info, TokenAccount>,

    #[account(mut)]
    pub manager: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(raffle_id: u64)]
pub struct FinishRaffle<'info> {
    #[account(
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,

    /// CHECK: may not exist (unknown id); address enforced by seeds, loaded in the handler.
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump
    )]
    pub raffle: UncheckedAccount<'info>,

    /// Checked against the raffle in the handler.
    pub prize_mint: Account<'info, Mint>,

    /// CHECK: may not exist (unknown id); deserialized in the handler.
    #[account(
        mut,
        seeds = [crate::PRIZE_VAULT_SEED, raffle_id.to_le_bytes().as_ref()],
        bump
    )]
    pub prize_vault: UncheckedAccount<'info>,

    /// Ticket at the drawn index; checked against the draw in the handler.
    pub winning_ticket: Account<'info, Ticket>,

    #[account(
        mut,
        constraint = winner_token_account.mint == prize_mint.key() @ RaffleError::PrizeMintMismatch
    )]
    pub winner_token_account: Account<'info, TokenAccount>,

    pub manager: Signer<'info>,

    /// CHECK: instruction sysvar (for ed25519 introspection). Address enforced.
    #[account(address = anchor_lang::solana_program::sysvar::instructions::ID)]
    pub instructions: UncheckedAccount<'info>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
#[instruction(raffle_id: u64)]
pub struct CancelRaffle<'info> {
    #[account(
        seeds = [crate::FACTORY_SEED],
        bump = factory.bump
    )]
    pub factory: Account<'info, Factory>,

    /// CHECK: may not exist (unknown id); address enforced by seeds, loaded in the handler.
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump
    )]
    pub raffle: UncheckedAccount<'info>,

    pub prize_mint: Account<'info, Mint>,

    /// CHECK: may not exist (unknown id); address enforced by seeds.
    #[account(
        mut,
        seeds = [crate::PRIZE_VAULT_SEED, raffle_id.to_le_bytes().as_ref()],
        bump
    )]
    pub prize_vault: UncheckedAccount<'info>,

    /// Creator's account; owner checked against the raffle in the handler.
    #[account(
        mut,
        constraint = refund_account.mint == prize_mint.key() @ RaffleError::PrizeMintMismatch
    )]
    pub refund_account: Account<'info, TokenAccount>,

    pub manager: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

// ----------------------------
// Ticket ledger
// ----------------------------

#[derive(Accounts)]
#[instruction(raffle_id: u64)]
pub struct MintTicket<'info> {
    #[account(
        mut,
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        init_if_needed,
        payer = user,
        space = 8 + Participant::INIT_SPACE,
        seeds = [crate::PARTICIPANT_SEED, raffle.key().as_ref(), user.key().as_ref()],
        bump
    )]
    pub participant: Account<'info, Participant>,

    #[account(
        init,
        payer = user,
        space = 8 + Ticket::INIT_SPACE,
        seeds = [
            crate::TICKET_SEED,
            raffle.key().as_ref(),
            raffle.next_ticket_id.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub ticket: Account<'info, Ticket>,

    #[account(mut)]
    pub user: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(raffle_id: u64, ticket_id: u64, to: Pubkey)]
pub struct TransferTicket<'info> {
    #[account(
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        mut,
        seeds = [crate::TICKET_SEED, raffle.key().as_ref(), ticket_id.to_le_bytes().as_ref()],
        bump = ticket.bump
    )]
    pub ticket: Account<'info, Ticket>,

    // init_if_needed so a non-holder gets NotOwner instead of a missing-account error.
    // Recipient checks sit here: both records share one PDA when `to == from`.
    #[account(
        init_if_needed,
        payer = from,
        space = 8 + Participant::INIT_SPACE,
        seeds = [crate::PARTICIPANT_SEED, raffle.key().as_ref(), from.key().as_ref()],
        bump,
        constraint = to != from.key() @ RaffleError::InvalidRecipient,
        constraint = to != Pubkey::default() @ RaffleError::InvalidRecipient
    )]
    pub from_participant: Account<'info, Participant>,

    #[account(
        init_if_needed,
        payer = from,
        space = 8 + Participant::INIT_SPACE,
        seeds = [crate::PARTICIPANT_SEED, raffle.key().as_ref(), to.as_ref()],
        bump
    )]
    pub to_participant: Account<'info, Participant>,

    #[account(mut)]
    pub from: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(raffle_id: u64, ticket_id: u64)]
pub struct TicketView<'info> {
    #[account(
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// CHECK: may not exist yet; address enforced by seeds, existence checked in the handler.
    #[account(
        seeds = [crate::TICKET_SEED, raffle.key().as_ref(), ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(raffle_id: u64, user: Pubkey)]
pub struct BalanceView<'info> {
    #[account(
        seeds = [crate::RAFFLE_SEED, raffle_id.to_le_bytes().as_ref()],
        bump = raffle.bump
    )]
    pub raffle: Account<'info, Raffle>,

    /// CHECK: may not exist (balance 0); address enforced by seeds.
    #[account(
        seeds = [crate::PARTICIPANT_SEED, raffle.key().as_ref(), user.as_ref()],
        bump
    )]
    pub participant: UncheckedAccount<'info>,
}
