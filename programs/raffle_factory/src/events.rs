use anchor_lang::prelude::*;

use crate::state::Role;

/// Emitted when a manager creates and funds a raffle.
#[event]
pub struct RaffleCreated {
    pub raffle_id: u64,
    pub raffle: Pubkey,
    pub created_by: Pubkey,
    pub prize_mint: Pubkey,
    pub prize_amount: u64,
}

/// Emitted once per raffle, when the prize leaves escrow for the winner.
#[event]
pub struct RaffleFinished {
    pub raffle_id: u64,
    pub winner: Pubkey,
    pub amount: u64,
    pub ticket_id: u64,
}

#[event]
pub struct RaffleCancelled {
    pub raffle_id: u64,
    pub refunded_to: Pubkey,
    pub amount: u64,
}

#[event]
pub struct TicketMinted {
    pub raffle_id: u64,
    pub ticket_id: u64,
    pub holder: Pubkey,
    pub minted_at: i64,
}

#[event]
pub struct TicketTransferred {
    pub raffle_id: u64,
    pub ticket_id: u64,
    pub from: Pubkey,
    pub to: Pubkey,
}

#[event]
pub struct RoleGranted {
    pub role: Role,
    pub account: Pubkey,
    pub sender: Pubkey,
}

#[event]
pub struct RoleRevoked {
    pub role: Role,
    pub account: Pubkey,
    pub sender: Pubkey,
}

#[event]
pub struct OracleUpdated {
    pub oracle: Pubkey,
}
