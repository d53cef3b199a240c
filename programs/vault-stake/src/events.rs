use anchor_lang::prelude::*;

#[event]
pub struct DepositEvent {
    pub user: Pubkey,
    pub amount: u64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct UnbondEvent {
    pub user: Pubkey,
    pub amount: u64,
    pub start_ts: i64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct RedeemEvent {
    pub user: Pubkey,
    pub amount: u64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct RewardsEpochCreated {
    pub admin: Pubkey,
    pub index: u64,
    pub merkle_root: [u8; 32],
    pub total: u64,
}

#[event]
pub struct RewardsClaimed {
    pub user: Pubkey,
    pub epoch: u64,
    pub amount: u64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct UnbondingPeriodUpdated {
    pub admin: Pubkey,
    pub old_period: i64,
    pub new_period: i64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdministratorRole {
    Freeze,
    Rewards,
}

#[event]
pub struct AdministratorsUpdated {
    pub admin: Pubkey,
    pub role: AdministratorRole,
    pub administrators: Vec<Pubkey>,
}

#[event]
pub struct TokenAccountFrozen {
    pub admin: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
}

#[event]
pub struct TokenAccountThawed {
    pub admin: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
}

#[event]
pub struct PauseUpdated {
    pub admin: Pubkey,
    pub paused: bool,
}

#[event]
pub struct MintAuthorityUpdated {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub new_authority: Pubkey,
}
