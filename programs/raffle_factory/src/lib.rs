use anchor_lang::prelude::*;

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;
pub mod contexts;
pub mod constants;


pub use utils::*;
pub use instructions::*;
pub use state::*;
pub use errors::*;
pub use contexts::*;
pub use constants::*;

declare_id!("7e8SUUWqynBvjBcC1oiKNYTLxKG8t9R2Cc2cRgFXHoBy");

#[program]
pub mod raffle_factory {
    use super::*;
    use crate::instructions::{admin, lifecycle, registry, ticket};

    // ----------------------------
    // Access control
    // ----------------------------
    pub fn initialize_factory(ctx: Context<InitializeFactory>) -> Result<()> {
        admin::initialize_factory(ctx)
    }

    pub fn grant_role(ctx: Context<ManageFactory>, role: Role, account: Pubkey) -> Result<()> {
        admin::grant_role(ctx, role, account)
    }

    pub fn revoke_role(ctx: Context<ManageFactory>, role: Role, account: Pubkey) -> Result<()> {
        admin::revoke_role(ctx, role, account)
    }

    pub fn has_role(ctx: Context<FactoryView>, role: Role, account: Pubkey) -> Result<bool> {
        admin::has_role(ctx, role, account)
    }

    pub fn set_oracle(ctx: Context<ManageFactory>, oracle: Pubkey) -> Result<()> {
        admin::set_oracle(ctx, oracle)
    }

    pub fn migrate_factory(ctx: Context<MigrateFactory>) -> Result<()> {
        admin::migrate_factory(ctx)
    }

    // ----------------------------
    // Registry
    // ----------------------------
    pub fn create_raffle(
        ctx: Context<CreateRaffle>,
        name: String,
        symbol: String,
        token_uri: String,
        amount: u64,
    ) -> Result<CreatedRaffle> {
        registry::create_raffle(ctx, name, symbol, token_uri, amount)
    }

    pub fn raffles_count(ctx: Context<FactoryView>) -> Result<u64> {
        registry::raffles_count(ctx)
    }

    pub fn raffle_address(ctx: Context<FactoryView>, raffle_id: u64) -> Result<Pubkey> {
        registry::raffle_address(ctx, raffle_id)
    }

    // ----------------------------
    // Settlement
    // ----------------------------
    // Declared before `finish_raffle`: anchor-syn takes the cfg of the last
    // handler using an Accounts struct for the `accounts::` re-export.
    #[cfg(feature = "mock-seed")]
    pub fn finish_raffle_mock(
        ctx: Context<FinishRaffle>,
        raffle_id: u64,
        seed: [u8; 32],
    ) -> Result<()> {
        lifecycle::finish_raffle_mock(ctx, raffle_id, seed)
    }

    pub fn finish_raffle(ctx: Context<FinishRaffle>, raffle_id: u64, seed: [u8; 32]) -> Result<()> {
        lifecycle::finish_raffle(ctx, raffle_id, seed)
    }

    pub fn cancel_raffle(ctx: Context<CancelRaffle>, raffle_id: u64) -> Result<()> {
        lifecycle::cancel_raffle(ctx, raffle_id)
    }

    // ----------------------------
    // Tickets
    // ----------------------------
    pub fn mint_ticket(ctx: Context<MintTicket>, raffle_id: u64) -> Result<()> {
        ticket::mint_ticket(ctx, raffle_id)
    }

    pub fn transfer_ticket(
        ctx: Context<TransferTicket>,
        raffle_id: u64,
        ticket_id: u64,
        to: Pubkey,
    ) -> Result<()> {
        ticket::transfer_ticket(ctx, raffle_id, ticket_id, to)
    }

    pub fn holder_of(ctx: Context<TicketView>, raffle_id: u64, ticket_id: u64) -> Result<Pubkey> {
        ticket::holder_of(ctx, raffle_id, ticket_id)
    }

    pub fn ticket_uri(ctx: Context<TicketView>, raffle_id: u64, ticket_id: u64) -> Result<String> {
        ticket::ticket_uri(ctx, raffle_id, ticket_id)
    }

    pub fn balance_of(ctx: Context<BalanceView>, raffle_id: u64, user: Pubkey) -> Result<u64> {
        ticket::balance_of(ctx, raffle_id, user)
    }
}
