use anchor_lang::error::Error;
use anchor_lang::prelude::*;

#[error_code]
#[derive(PartialEq, Eq)]
pub enum VaultStakeErrorCode {
    #[msg("Invalid amount")]
    InvalidAmount = 1,
    #[msg("Invalid mint provided")]
    InvalidMint = 2,
    #[msg("Vault mint and stake mint cannot be the same")]
    VaultAndMintCannotBeSame = 3,
    #[msg("Unbonding period is outside the allowed range")]
    InvalidBondingPeriod = 4,
    #[msg("Insufficient balance")]
    InsufficientBalance = 5,
    #[msg("Unbonding period not elapsed")]
    UnbondingPeriodNotElapsed = 6,
    #[msg("Insufficient unbonding balance")]
    InsufficientUnbondingBalance = 7,
    #[msg("Unbonding is currently in progress")]
    TicketAlreadyExists = 8,
    #[msg("No active unbonding ticket")]
    NoActiveTicket = 9,
    #[msg("Invalid timestamp")]
    InvalidTimestamp = 10,
    #[msg("Invalid ticket owner")]
    InvalidTicketOwner = 11,
    #[msg("Arithmetic overflow")]
    MathOverflow = 12,
    #[msg("Insufficient vault balance")]
    InsufficientVaultBalance = 13,

    #[msg("Program is already initialized")]
    AlreadyInitialized = 14,
    #[msg("Program is not initialized")]
    NotInitialized = 15,
    #[msg("ProgramData account could not be decoded.")]
    InvalidProgramData = 16,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority = 17,
    #[msg("Signer is not the upgrade authority.")]
    InvalidUpgradeAuthority = 18,
    #[msg("Protocol is paused")]
    ProtocolPaused = 19,
    #[msg("Too many administrators.")]
    TooManyAdministrators = 20,
    #[msg("Unauthorized freeze administrator")]
    UnauthorizedFreezeAdministrator = 21,
    #[msg("Rewards epoch not found")]
    EpochNotFound = 22,
    #[msg("Invalid merkle proof")]
    InvalidMerkleProof = 23,
    #[msg("Rewards already claimed for this epoch")]
    RewardsAlreadyClaimed = 24,
    #[msg("Invalid rewards administrator")]
    InvalidRewardsAdministrator = 25,
    #[msg("Rewards epoch already exists")]
    EpochAlreadyExists = 26,
    #[msg("Duplicate administrator in list")]
    DuplicateAdministrator = 27,
    #[msg("Merkle proof is too long")]
    ProofTooLong = 28,
    #[msg("Program-owned token accounts cannot be frozen or thawed")]
    ProgramOwnedAccount = 29,
}

/// Broad failure category, independent of the specific code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authorization,
    Validation,
    StateConflict,
    DuplicateClaim,
    NotFound,
    Paused,
    /// Reported by the asset-custody capability rather than by this program.
    Custody,
}

impl VaultStakeErrorCode {
    pub const ALL: [VaultStakeErrorCode; 29] = [
        Self::InvalidAmount,
        Self::InvalidMint,
        Self::VaultAndMintCannotBeSame,
        Self::InvalidBondingPeriod,
        Self::InsufficientBalance,
        Self::UnbondingPeriodNotElapsed,
        Self::InsufficientUnbondingBalance,
        Self::TicketAlreadyExists,
        Self::NoActiveTicket,
        Self::InvalidTimestamp,
        Self::InvalidTicketOwner,
        Self::MathOverflow,
        Self::InsufficientVaultBalance,
        Self::AlreadyInitialized,
        Self::NotInitialized,
        Self::InvalidProgramData,
        Self::NoUpgradeAuthority,
        Self::InvalidUpgradeAuthority,
        Self::ProtocolPaused,
        Self::TooManyAdministrators,
        Self::UnauthorizedFreezeAdministrator,
        Self::EpochNotFound,
        Self::InvalidMerkleProof,
        Self::RewardsAlreadyClaimed,
        Self::InvalidRewardsAdministrator,
        Self::EpochAlreadyExists,
        Self::DuplicateAdministrator,
        Self::ProofTooLong,
        Self::ProgramOwnedAccount,
    ];

    pub fn kind(self) -> ErrorKind {
        use VaultStakeErrorCode::*;
        match self {
            InvalidUpgradeAuthority
            | NoUpgradeAuthority
            | InvalidProgramData
            | UnauthorizedFreezeAdministrator
            | InvalidRewardsAdministrator
            | InvalidTicketOwner => ErrorKind::Authorization,
            InvalidAmount
            | InvalidMint
            | VaultAndMintCannotBeSame
            | InvalidBondingPeriod
            | InsufficientBalance
            | InsufficientUnbondingBalance
            | InvalidTimestamp
            | MathOverflow
            | TooManyAdministrators
            | DuplicateAdministrator
            | InvalidMerkleProof
            | ProofTooLong
            | ProgramOwnedAccount => ErrorKind::Validation,
            AlreadyInitialized
            | TicketAlreadyExists
            | EpochAlreadyExists
            | UnbondingPeriodNotElapsed
            | InsufficientVaultBalance => ErrorKind::StateConflict,
            RewardsAlreadyClaimed => ErrorKind::DuplicateClaim,
            NotInitialized | NoActiveTicket | EpochNotFound => ErrorKind::NotFound,
            ProtocolPaused => ErrorKind::Paused,
        }
    }

    /// Looks up the code carried by an anchor error, if it is one of ours.
    pub fn from_error(err: &Error) -> Option<Self> {
        match err {
            Error::AnchorError(anchor_error) => Self::ALL
                .into_iter()
                .find(|code| u32::from(*code) == anchor_error.error_code_number),
            Error::ProgramError(_) => None,
        }
    }
}

/// Classifies any error returned by the dispatcher.
pub fn error_kind(err: &Error) -> ErrorKind {
    match err {
        Error::AnchorError(_) => VaultStakeErrorCode::from_error(err)
            .map(VaultStakeErrorCode::kind)
            // framework codes, e.g. an undecodable instruction or record
            .unwrap_or(ErrorKind::Validation),
        Error::ProgramError(_) => ErrorKind::Custody,
    }
}
