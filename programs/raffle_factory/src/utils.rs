use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use solana_sha256_hasher::hashv;

use crate::constants::MAX_SELECTION_ROUNDS;
use crate::errors::RaffleError;

// Ed25519SigVerify111111111111111111111111111
pub fn ed25519_program_id() -> Pubkey {
    Pubkey::new_from_array([
        3, 125, 70, 214, 124, 147, 251, 190, 18, 249, 66, 143, 131, 141, 64, 255,
        5, 112, 116, 73, 39, 244, 138, 100, 252, 202, 112, 68, 128, 0, 0, 0,
    ])
}

// -----------------
// Seeds
// -----------------
pub const FACTORY_SEED: &[u8] = b"factory_v1";
pub const RAFFLE_SEED: &[u8] = b"raffle_v1";
pub const PRIZE_VAULT_SEED: &[u8] = b"prize_vault_v1";
pub const TICKET_SEED: &[u8] = b"ticket_v1";
pub const PARTICIPANT_SEED: &[u8] = b"participant_v1";

pub fn find_factory_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_SEED], program_id)
}

/// The registry mapping: raffle id -> raffle instance address.
pub fn find_raffle_address(program_id: &Pubkey, raffle_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[RAFFLE_SEED, &raffle_id.to_le_bytes()], program_id)
}

pub fn find_prize_vault_address(program_id: &Pubkey, raffle_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PRIZE_VAULT_SEED, &raffle_id.to_le_bytes()], program_id)
}

pub fn find_ticket_address(program_id: &Pubkey, raffle: &Pubkey, ticket_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[TICKET_SEED, raffle.as_ref(), &ticket_id.to_le_bytes()],
        program_id,
    )
}

pub fn find_participant_address(program_id: &Pubkey, raffle: &Pubkey, user: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PARTICIPANT_SEED, raffle.as_ref(), user.as_ref()], program_id)
}

// ---------------
// Return payloads
// ---------------
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreatedRaffle {
    pub raffle_id: u64,
    pub raffle: Pubkey,
}

// -------------------------
// Escrow funding
// -------------------------

/// The funding side of `create_raffle`, reduced to what the token account says.
#[derive(Clone, Copy, Debug)]
pub struct FundingSource {
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub delegated_amount: u64,
}

/// `manager` may move `amount` out of `source` when it owns the account, or when the
/// owner delegated at least `amount` to it.
pub fn check_funding(source: &FundingSource, manager: &Pubkey, amount: u64) -> Result<()> {
    if source.owner != *manager {
        let delegated = source.delegate.as_ref() == Some(manager);
        require!(
            delegated && source.delegated_amount >= amount,
            RaffleError::InsufficientAllowance
        );
    }
    require!(source.amount >= amount, RaffleError::InsufficientBalance);
    Ok(())
}

// -------------------------
// Winner selection
// -------------------------

fn draw(seed: &[u8; 32], raffle_id: u64, total: u64, round: u64) -> u64 {
    let h = hashv(&[
        b"raffle-winner".as_ref(),
        raffle_id.to_le_bytes().as_ref(),
        total.to_le_bytes().as_ref(),
        round.to_le_bytes().as_ref(),
        seed.as_ref(),
    ])
    .to_bytes();

    let mut word = [0u8; 8];
    word.copy_from_slice(&h[..8]);
    u64::from_le_bytes(word)
}

/// Maps a settlement seed to a ticket id in `[0, total)`.
///
/// Draws landing in the biased tail of the `u64` range are re-hashed with a round counter.
/// Every ticket id is equally likely, so an address holding `k` of `n` tickets wins with
/// probability `k / n`.
pub fn select_winning_index(seed: &[u8; 32], raffle_id: u64, total: u64) -> Result<u64> {
    require!(total > 0, RaffleError::NoParticipants);

    if total.is_power_of_two() {
        return Ok(draw(seed, raffle_id, total, 0) & (total - 1));
    }

    let zone = u64::MAX - (u64::MAX % total);
    let mut value = 0;
    for round in 0..MAX_SELECTION_ROUNDS {
        value = draw(seed, raffle_id, total, round);
        if value < zone {
            break;
        }
    }
    Ok(value % total)
}

// -------------------------
// Oracle seed message + ed25519 parsing
// -------------------------

/// Message the randomness oracle signs for one settlement.
/// Binding `ticket_count` makes a seed useless once more tickets are minted.
pub fn expected_seed_msg(
    program_id: &Pubkey,
    raffle_id: u64,
    ticket_count: u64,
    seed: &[u8; 32],
) -> Vec<u8> {
    let mut out = Vec::with_capacity(b"raffle-factory:seed_v1".len() + 32 + 8 + 8 + 32);
    out.extend_from_slice(b"raffle-factory:seed_v1");
    out.extend_from_slice(program_id.as_ref());
    out.extend_from_slice(&raffle_id.to_le_bytes());
    out.extend_from_slice(&ticket_count.to_le_bytes());
    out.extend_from_slice(seed);
    out
}

pub fn parse_ed25519_ix_pubkey_and_msg(ix: &Instruction) -> Result<(Pubkey, Vec<u8>)> {
    require!(
        ix.program_id == ed25519_program_id(),
        RaffleError::MissingOrInvalidEd25519Ix
    );

    let data = &ix.data;
    require!(data.len() >= 16, RaffleError::MissingOrInvalidEd25519Ix);

    let num_sigs = data[0];
    require!(num_sigs == 1, RaffleError::MissingOrInvalidEd25519Ix);

    // Offsets must point into this same instruction (instruction_index == u16::MAX).
    let sig_ix = u16::from_le_bytes([data[4], data[5]]);
    let pk_ix = u16::from_le_bytes([data[8], data[9]]);
    let msg_ix = u16::from_le_bytes([data[14], data[15]]);
    require!(sig_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);
    require!(pk_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);
    require!(msg_ix == u16::MAX, RaffleError::MissingOrInvalidEd25519Ix);

    let pk_off = u16::from_le_bytes([data[6], data[7]]) as usize;
    let msg_off = u16::from_le_bytes([data[10], data[11]]) as usize;
    let msg_sz = u16::from_le_bytes([data[12], data[13]]) as usize;

    require!(pk_off + 32 <= data.len(), RaffleError::MissingOrInvalidEd25519Ix);
    require!(msg_off + msg_sz <= data.len(), RaffleError::MissingOrInvalidEd25519Ix);

    let pk_bytes: [u8; 32] = data[pk_off..pk_off + 32]
        .try_into()
        .map_err(|_| error!(RaffleError::MissingOrInvalidEd25519Ix))?;
    let msg = data[msg_off..msg_off + msg_sz].to_vec();

    Ok((Pubkey::new_from_array(pk_bytes), msg))
}

pub fn assert_ed25519_ix_matches(
    ix: &Instruction,
    expected_pubkey: &Pubkey,
    expected_msg: &[u8],
) -> Result<()> {
    let (pk, msg) = parse_ed25519_ix_pubkey_and_msg(ix)?;

    require_keys_eq!(pk, *expected_pubkey, RaffleError::Ed25519PubkeyMismatch);
    require!(msg.as_slice() == expected_msg, RaffleError::Ed25519MessageMismatch);

    Ok(())
}
