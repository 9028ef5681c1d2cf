use anchor_lang::prelude::*;

#[error_code]
pub enum RaffleError {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Cannot revoke the last admin")]
    LastAdmin,
    #[msg("Role member list is full")]
    RoleTableFull,
    #[msg("Invalid role member")]
    InvalidRoleMember,

    #[msg("Mint cooldown active (one ticket per 24h per address)")]
    CooldownActive,

    #[msg("Raffle is finished")]
    RaffleFinished,
    #[msg("Raffle already finished")]
    AlreadyFinished,
    #[msg("Raffle has no participants")]
    NoParticipants,
    #[msg("Raffle already has participants")]
    HasParticipants,

    #[msg("Unknown raffle")]
    UnknownRaffle,
    #[msg("Unknown ticket")]
    UnknownTicket,

    #[msg("Insufficient allowance on the funding account")]
    InsufficientAllowance,
    #[msg("Insufficient balance on the funding account")]
    InsufficientBalance,
    #[msg("Token account mint does not match the prize mint")]
    PrizeMintMismatch,

    #[msg("Caller does not hold this ticket")]
    NotOwner,
    #[msg("Invalid ticket recipient")]
    InvalidRecipient,

    #[msg("Winning ticket account mismatch")]
    WinningTicketMismatch,
    #[msg("Winner token account is not owned by the ticket holder")]
    WinnerAccountMismatch,
    #[msg("Account belongs to another raffle")]
    RaffleMismatch,

    #[msg("Name too long")]
    NameTooLong,
    #[msg("Symbol too long")]
    SymbolTooLong,
    #[msg("Metadata URI too long")]
    MetadataUriTooLong,

    #[msg("Randomness oracle not set")]
    OracleNotSet,
    #[msg("Missing or invalid ed25519 verify instruction")]
    MissingOrInvalidEd25519Ix,
    #[msg("Ed25519 pubkey mismatch")]
    Ed25519PubkeyMismatch,
    #[msg("Ed25519 message mismatch")]
    Ed25519MessageMismatch,

    #[msg("Account written by an unsupported schema version")]
    UnsupportedVersion,

    #[msg("Math overflow")]
    MathOverflow,
}
