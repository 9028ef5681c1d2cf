use anchor_lang::prelude::*;

use crate::errors::RaffleError;
use crate::events::{TicketMinted, TicketTransferred};
use crate::state::{Participant, Raffle, Ticket};
use crate::{BalanceView, MintTicket, TicketView, TransferTicket};

/// One ticket per address per 24h. The caller becomes the holder.
pub fn mint_ticket(ctx: Context<MintTicket>, raffle_id: u64) -> Result<()> {
    let user = ctx.accounts.user.key();
    let raffle_key = ctx.accounts.raffle.key();
    let now = Clock::get()?.unix_timestamp;

    let raffle = &mut ctx.accounts.raffle;
    raffle.require_open()?;

    let participant = &mut ctx.accounts.participant;
    participant.bind(raffle_key, user, ctx.bumps.participant);
    participant.record_mint(now)?;

    let ticket_id = raffle.issue_ticket_id()?;

    let ticket = &mut ctx.accounts.ticket;
    ticket.raffle = raffle_key;
    ticket.ticket_id = ticket_id;
    ticket.bump = ctx.bumps.ticket;
    ticket.holder = user;
    ticket.minted_at = now;

    emit!(TicketMinted {
        raffle_id,
        ticket_id,
        holder: user,
        minted_at: now,
    });

    Ok(())
}

pub fn transfer_ticket(
    ctx: Context<TransferTicket>,
    raffle_id: u64,
    ticket_id: u64,
    to: Pubkey,
) -> Result<()> {
    let from = ctx.accounts.from.key();
    let raffle_key = ctx.accounts.raffle.key();

    ctx.accounts.ticket.reassign(&from, to)?;

    let from_participant = &mut ctx.accounts.from_participant;
    from_participant.bind(raffle_key, from, ctx.bumps.from_participant);
    from_participant.debit()?;

    let to_participant = &mut ctx.accounts.to_participant;
    to_participant.bind(raffle_key, to, ctx.bumps.to_participant);
    to_participant.credit()?;

    emit!(TicketTransferred {
        raffle_id,
        ticket_id,
        from,
        to,
    });

    Ok(())
}

pub fn holder_of(ctx: Context<TicketView>, _raffle_id: u64, ticket_id: u64) -> Result<Pubkey> {
    let ticket = load_ticket(&ctx.accounts.raffle, &ctx.accounts.ticket, ticket_id)?;
    Ok(ticket.holder)
}

/// Every ticket of a raffle shares the raffle's metadata URI.
pub fn ticket_uri(ctx: Context<TicketView>, _raffle_id: u64, ticket_id: u64) -> Result<String> {
    load_ticket(&ctx.accounts.raffle, &ctx.accounts.ticket, ticket_id)?;
    Ok(ctx.accounts.raffle.metadata_uri.clone())
}

pub fn balance_of(ctx: Context<BalanceView>, _raffle_id: u64, _user: Pubkey) -> Result<u64> {
    let info = &ctx.accounts.participant;
    if info.data_is_empty() {
        return Ok(0);
    }
    require_keys_eq!(*info.owner, crate::ID, RaffleError::RaffleMismatch);

    let data = info.try_borrow_data()?;
    let participant = Participant::try_deserialize(&mut &data[..])?;
    Ok(participant.balance)
}

fn load_ticket(raffle: &Raffle, info: &AccountInfo, ticket_id: u64) -> Result<Ticket> {
    require!(raffle.ticket_exists(ticket_id), RaffleError::UnknownTicket);
    require!(!info.data_is_empty(), RaffleError::UnknownTicket);
    require_keys_eq!(*info.owner, crate::ID, RaffleError::UnknownTicket);

    let data = info.try_borrow_data()?;
    Ticket::try_deserialize(&mut &data[..])
}
