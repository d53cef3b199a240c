use crate::error::VaultStakeErrorCode;
use anchor_lang::prelude::*;

pub const MAX_ADMINISTRATORS: usize = 5;
pub const MIN_UNBONDING_PERIOD: i64 = 0;
pub const MAX_UNBONDING_PERIOD: i64 = 365 * 24 * 60 * 60;
// deep enough for 2^32 allocations per epoch
pub const MAX_PROOF_LEN: usize = 32;

/// A record kept in the ledger store. `LEN` is the space reserved for it,
/// discriminator included.
pub trait LedgerRecord: AccountSerialize + AccountDeserialize {
    const LEN: usize;
}

/// Fixed-capacity ordered set of administrator keys.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AdministratorSet {
    members: [Pubkey; MAX_ADMINISTRATORS],
    len: u8,
}

impl AdministratorSet {
    pub const LEN: usize = 32 * MAX_ADMINISTRATORS + 1;

    pub fn try_from_slice_checked(administrators: &[Pubkey]) -> Result<Self> {
        require!(
            administrators.len() <= MAX_ADMINISTRATORS,
            VaultStakeErrorCode::TooManyAdministrators
        );
        let mut set = Self::default();
        for (i, admin) in administrators.iter().enumerate() {
            require!(
                !administrators[..i].contains(admin),
                VaultStakeErrorCode::DuplicateAdministrator
            );
            set.members[i] = *admin;
        }
        set.len = administrators.len() as u8;
        Ok(set)
    }

    pub fn as_slice(&self) -> &[Pubkey] {
        &self.members[..usize::from(self.len).min(MAX_ADMINISTRATORS)]
    }

    pub fn contains(&self, key: &Pubkey) -> bool {
        self.as_slice().contains(key)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub vault_mint: Pubkey,
    pub stake_mint: Pubkey,
    pub unbonding_period: i64,
    pub freeze_administrators: AdministratorSet,
    pub rewards_administrators: AdministratorSet,
    pub paused: bool,
}

impl Config {
    pub const SEED_PREFIX: &'static [u8] = b"config";
}

impl LedgerRecord for Config {
    const LEN: usize = 8 + 32 + 32 + 8 + AdministratorSet::LEN * 2 + 1;
}

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct UnbondingTicket {
    pub owner: Pubkey,
    pub requested_amount: u64,
    pub start_ts: i64,
}

impl UnbondingTicket {
    pub const SEED_PREFIX: &'static [u8] = b"ticket";

    pub fn matures_at(&self, unbonding_period: i64) -> Option<i64> {
        self.start_ts.checked_add(unbonding_period)
    }

    pub fn is_matured(&self, unbonding_period: i64, now: i64) -> bool {
        self.matures_at(unbonding_period)
            .map_or(false, |matures_at| now >= matures_at)
    }
}

impl LedgerRecord for UnbondingTicket {
    const LEN: usize = 8 + 32 + 8 + 8;
}

#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct RewardsEpoch {
    pub index: u64,            // epoch id
    pub merkle_root: [u8; 32], // sha256 root (sortPairs)
    pub total: u64,            // advisory: sum of all allocations
    pub created_ts: i64,
}

impl RewardsEpoch {
    pub const SEED_PREFIX: &'static [u8] = b"epoch";
}

impl LedgerRecord for RewardsEpoch {
    const LEN: usize = 8 + 8 + 32 + 8 + 8;
}

#[account]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ClaimRecord {} // empty marker, existence = already claimed

impl ClaimRecord {
    pub const SEED_PREFIX: &'static [u8] = b"claim";
}

impl LedgerRecord for ClaimRecord {
    const LEN: usize = 8;
}
