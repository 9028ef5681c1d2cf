use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RaffleError;
use crate::events::{OracleUpdated, RoleGranted, RoleRevoked};
use crate::state::Role;
use crate::{FactoryView, InitializeFactory, ManageFactory, MigrateFactory};

pub fn initialize_factory(ctx: Context<InitializeFactory>) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    ctx.accounts.factory.genesis(admin, ctx.bumps.factory);

    msg!("Factory initialized, admin {}", admin);
    Ok(())
}

pub fn grant_role(ctx: Context<ManageFactory>, role: Role, account: Pubkey) -> Result<()> {
    let sender = ctx.accounts.admin.key();
    let factory = &mut ctx.accounts.factory;
    factory.require_role(Role::Admin, &sender)?;

    if factory.grant(role, account)? {
        emit!(RoleGranted { role, account, sender });
    }
    Ok(())
}

pub fn revoke_role(ctx: Context<ManageFactory>, role: Role, account: Pubkey) -> Result<()> {
    let sender = ctx.accounts.admin.key();
    let factory = &mut ctx.accounts.factory;
    factory.require_role(Role::Admin, &sender)?;

    if factory.revoke(role, &account)? {
        emit!(RoleRevoked { role, account, sender });
    }
    Ok(())
}

pub fn has_role(ctx: Context<FactoryView>, role: Role, account: Pubkey) -> Result<bool> {
    Ok(ctx.accounts.factory.has_role(role, &account))
}

pub fn set_oracle(ctx: Context<ManageFactory>, oracle: Pubkey) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    factory.require_role(Role::Admin, &ctx.accounts.admin.key())?;

    factory.oracle_pubkey = oracle;
    emit!(OracleUpdated { oracle });
    Ok(())
}

/// Brings the factory account to this build's layout. Roles and the raffle counter are
/// carried over untouched; only the size and the version change.
pub fn migrate_factory(ctx: Context<MigrateFactory>) -> Result<()> {
    let factory = &mut ctx.accounts.factory;
    factory.require_role(Role::Admin, &ctx.accounts.admin.key())?;
    require!(factory.version <= CURRENT_VERSION, RaffleError::UnsupportedVersion);

    let from = factory.version;
    factory.version = CURRENT_VERSION;

    msg!("Factory migrated: v{} -> v{}", from, CURRENT_VERSION);
    Ok(())
}
