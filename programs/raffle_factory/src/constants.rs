// Centralized Program Constants

// Ticket issuance
// ===============

/// Minimum number of seconds between two mints by the same address in one raffle.
/// Measured against the cluster clock (`Clock::unix_timestamp`).
pub const MINT_COOLDOWN_SECS: i64 = 24 * 60 * 60;

// Access control
// ==============

/// Capacity of each role member list (admins, managers).
/// NOTE: fixed so the factory account size stays deterministic.
pub const MAX_ROLE_MEMBERS: usize = 16;

// Raffle metadata limits (bytes)
// ==============================

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;

// Schema
// ======

/// Layout version written by this build of the program.
/// Accounts carrying a higher version were written by a newer build and are rejected by migrations.
pub const CURRENT_VERSION: u16 = 1;

/// First raffle id handed out by a fresh factory.
pub const INITIAL_RAFFLE_ID: u64 = 0;

/// Upper bound on re-hash rounds while rejecting biased draws.
pub const MAX_SELECTION_ROUNDS: u64 = 8;
