use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::RaffleError;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Grants and revokes both roles, configures the factory.
    Admin,
    /// Creates, finishes and cancels raffles.
    Manager,
}

#[account]
#[derive(InitSpace)]
pub struct Factory {
    pub bump: u8,
    pub version: u16,

    /// Raffles ever created. Also the id handed to the next raffle.
    pub raffles_count: u64,

    /// Signer of settlement seeds (ed25519 introspection).
    pub oracle_pubkey: Pubkey,

    #[max_len(16)]
    pub admins: Vec<Pubkey>,
    #[max_len(16)]
    pub managers: Vec<Pubkey>,
}

impl Factory {
    /// Genesis: the deployer holds both roles.
    pub fn genesis(&mut self, deployer: Pubkey, bump: u8) {
        self.bump = bump;
        self.version = CURRENT_VERSION;
        self.raffles_count = INITIAL_RAFFLE_ID;
        self.oracle_pubkey = Pubkey::default();
        self.admins = vec![deployer];
        self.managers = vec![deployer];
    }

    fn members(&self, role: Role) -> &Vec<Pubkey> {
        match role {
            Role::Admin => &self.admins,
            Role::Manager => &self.managers,
        }
    }

    fn members_mut(&mut self, role: Role) -> &mut Vec<Pubkey> {
        match role {
            Role::Admin => &mut self.admins,
            Role::Manager => &mut self.managers,
        }
    }

    pub fn has_role(&self, role: Role, who: &Pubkey) -> bool {
        self.members(role).contains(who)
    }

    pub fn require_role(&self, role: Role, who: &Pubkey) -> Result<()> {
        require!(self.has_role(role, who), RaffleError::Unauthorized);
        Ok(())
    }

    /// Returns `true` when `who` did not hold `role` before.
    pub fn grant(&mut self, role: Role, who: Pubkey) -> Result<bool> {
        require!(who != Pubkey::default(), RaffleError::InvalidRoleMember);
        if self.has_role(role, &who) {
            return Ok(false);
        }

        let members = self.members_mut(role);
        require!(members.len() < MAX_ROLE_MEMBERS, RaffleError::RoleTableFull);
        members.push(who);
        Ok(true)
    }

    /// Returns `true` when `who` held `role` before.
    pub fn revoke(&mut self, role: Role, who: &Pubkey) -> Result<bool> {
        let Some(pos) = self.members(role).iter().position(|x| x == who) else {
            return Ok(false);
        };
        if role == Role::Admin {
            require!(self.admins.len() > 1, RaffleError::LastAdmin);
        }

        // Stable removal (keeps relative order).
        self.members_mut(role).remove(pos);
        Ok(true)
    }

    /// Hands out the next raffle id and bumps the counter.
    pub fn allocate_raffle_id(&mut self) -> Result<u64> {
        let id = self.raffles_count;
        self.raffles_count = id.checked_add(1).ok_or(RaffleError::MathOverflow)?;
        Ok(id)
    }

    pub fn require_known_raffle(&self, raffle_id: u64) -> Result<()> {
        require!(raffle_id < self.raffles_count, RaffleError::UnknownRaffle);
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleStatus {
    Started,
    Finished,
}

#[account]
#[derive(InitSpace)]
pub struct Raffle {
    pub raffle_id: u64,
    pub bump: u8,
    pub version: u16,

    pub created_by: Pubkey,
    pub created_at: i64,

    // ticket collection metadata (shared by every ticket)
    #[max_len(32)]
    pub name: String,
    #[max_len(10)]
    pub symbol: String,
    #[max_len(200)]
    pub metadata_uri: String,

    // escrow
    pub prize_mint: Pubkey,
    pub prize_amount: u64,
    pub prize_vault: Pubkey,
    pub prize_vault_bump: u8,

    pub started: bool,
    pub finished: bool,
    pub finished_at: i64,

    /// Total tickets ever minted; also the next ticket id.
    pub next_ticket_id: u64,

    /// `Pubkey::default()` until settled.
    pub winner: Pubkey,
    pub winning_ticket: Option<u64>,
}

impl Raffle {
    /// Reads a raffle PDA handed in unchecked. Missing or foreign accounts are `UnknownRaffle`.
    pub fn load(info: &AccountInfo) -> Result<Raffle> {
        require!(!info.data_is_empty(), RaffleError::UnknownRaffle);
        require_keys_eq!(*info.owner, crate::ID, RaffleError::UnknownRaffle);

        let data = info.try_borrow_data()?;
        Raffle::try_deserialize(&mut &data[..])
    }

    /// Writes back a raffle obtained through [`Raffle::load`].
    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        let mut data = info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }

    pub fn validate_metadata(name: &str, symbol: &str, metadata_uri: &str) -> Result<()> {
        require!(name.len() <= MAX_NAME_LEN, RaffleError::NameTooLong);
        require!(symbol.len() <= MAX_SYMBOL_LEN, RaffleError::SymbolTooLong);
        require!(metadata_uri.len() <= MAX_URI_LEN, RaffleError::MetadataUriTooLong);
        Ok(())
    }

    pub fn status(&self) -> RaffleStatus {
        if self.finished {
            RaffleStatus::Finished
        } else {
            RaffleStatus::Started
        }
    }

    pub fn require_open(&self) -> Result<()> {
        require!(self.status() == RaffleStatus::Started, RaffleError::RaffleFinished);
        Ok(())
    }

    pub fn ticket_exists(&self, ticket_id: u64) -> bool {
        ticket_id < self.next_ticket_id
    }

    /// Next sequential ticket id. Fails once the raffle is finished.
    pub fn issue_ticket_id(&mut self) -> Result<u64> {
        self.require_open()?;
        let id = self.next_ticket_id;
        self.next_ticket_id = id.checked_add(1).ok_or(RaffleError::MathOverflow)?;
        Ok(id)
    }

    /// Preconditions of settlement. Returns the number of tickets to draw from.
    pub fn settleable_tickets(&self) -> Result<u64> {
        require!(self.status() == RaffleStatus::Started, RaffleError::AlreadyFinished);
        require!(self.next_ticket_id > 0, RaffleError::NoParticipants);
        Ok(self.next_ticket_id)
    }

    /// Commits the winner. Must run before the payout leaves the vault.
    pub fn record_winner(&mut self, ticket_id: u64, winner: Pubkey, now: i64) -> Result<()> {
        self.settleable_tickets()?;
        require!(self.ticket_exists(ticket_id), RaffleError::UnknownTicket);
        require!(winner != Pubkey::default(), RaffleError::InvalidRecipient);

        self.winner = winner;
        self.winning_ticket = Some(ticket_id);
        self.finished = true;
        self.finished_at = now;
        Ok(())
    }

    /// Closes a raffle nobody entered. The escrow goes back to the creator.
    pub fn record_cancel(&mut self, now: i64) -> Result<()> {
        require!(self.status() == RaffleStatus::Started, RaffleError::AlreadyFinished);
        require!(self.next_ticket_id == 0, RaffleError::HasParticipants);

        self.finished = true;
        self.finished_at = now;
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct Ticket {
    pub raffle: Pubkey,
    pub ticket_id: u64,
    pub bump: u8,

    pub holder: Pubkey,
    pub minted_at: i64,
}

impl Ticket {
    pub fn require_holder(&self, who: &Pubkey) -> Result<()> {
        require_keys_eq!(self.holder, *who, RaffleError::NotOwner);
        Ok(())
    }

    pub fn reassign(&mut self, from: &Pubkey, to: Pubkey) -> Result<()> {
        self.require_holder(from)?;
        require!(to != Pubkey::default(), RaffleError::InvalidRecipient);
        require!(to != *from, RaffleError::InvalidRecipient);
        self.holder = to;
        Ok(())
    }
}

/// Per (raffle, address) ticket bookkeeping.
#[account]
#[derive(InitSpace)]
pub struct Participant {
    pub raffle: Pubkey,
    pub user: Pubkey,
    pub bump: u8,

    /// Tickets currently held (mints + transfers in - transfers out).
    pub balance: u64,
    /// Tickets this address minted itself.
    pub minted_count: u64,
    /// Only the address's own mints move this.
    pub last_mint_time: Option<i64>,
}

impl Participant {
    /// Binds a freshly created (`init_if_needed`) record. No-op on existing ones.
    pub fn bind(&mut self, raffle: Pubkey, user: Pubkey, bump: u8) {
        if self.user == Pubkey::default() {
            self.raffle = raffle;
            self.user = user;
            self.bump = bump;
            self.balance = 0;
            self.minted_count = 0;
            self.last_mint_time = None;
        }
    }

    pub fn check_cooldown(&self, now: i64) -> Result<()> {
        if let Some(last) = self.last_mint_time {
            // A clock behind the last mint counts as "too early".
            let elapsed = now.checked_sub(last).unwrap_or(i64::MIN);
            require!(elapsed >= MINT_COOLDOWN_SECS, RaffleError::CooldownActive);
        }
        Ok(())
    }

    pub fn record_mint(&mut self, now: i64) -> Result<()> {
        self.check_cooldown(now)?;
        self.last_mint_time = Some(now);
        self.minted_count = self.minted_count.checked_add(1).ok_or(RaffleError::MathOverflow)?;
        self.credit()
    }

    pub fn credit(&mut self) -> Result<()> {
        self.balance = self.balance.checked_add(1).ok_or(RaffleError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self) -> Result<()> {
        self.balance = self.balance.checked_sub(1).ok_or(RaffleError::NotOwner)?;
        Ok(())
    }
}
