use crate::custody::TokenAccountRef;
use crate::merkle::Hash32;
use anchor_lang::prelude::*;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum VaultStakeInstruction {
    /// Creates the config:
    /// - vault_mint: the token users deposit (e.g., wYLDS)
    /// - stake_mint: the token users receive for it (e.g., PRIME)
    /// - unbonding_period: seconds a ticket must age before redeem
    Initialize {
        vault_mint: Pubkey,
        stake_mint: Pubkey,
        unbonding_period: i64,
        freeze_administrators: Vec<Pubkey>,
        rewards_administrators: Vec<Pubkey>,
    },
    Pause {
        pause: bool,
    },
    UpdateConfig {
        new_unbonding_period: i64,
    },
    Deposit {
        amount: u64,
    },
    Unbond {
        amount: u64,
    },
    Redeem,
    UpdateFreezeAdministrators {
        new_administrators: Vec<Pubkey>,
    },
    UpdateRewardsAdministrators {
        new_administrators: Vec<Pubkey>,
    },
    FreezeTokenAccount {
        token_account: TokenAccountRef,
    },
    ThawTokenAccount {
        token_account: TokenAccountRef,
    },
    SetMintAuthority {
        new_authority: Pubkey,
    },
    CreateRewardsEpoch {
        index: u64,
        merkle_root: Hash32,
        total: u64,
    },
    ClaimRewards {
        epoch_index: u64,
        amount: u64,
        proof: Vec<Hash32>,
    },
}

impl VaultStakeInstruction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => "Initialize",
            Self::Pause { .. } => "Pause",
            Self::UpdateConfig { .. } => "UpdateConfig",
            Self::Deposit { .. } => "Deposit",
            Self::Unbond { .. } => "Unbond",
            Self::Redeem => "Redeem",
            Self::UpdateFreezeAdministrators { .. } => "UpdateFreezeAdministrators",
            Self::UpdateRewardsAdministrators { .. } => "UpdateRewardsAdministrators",
            Self::FreezeTokenAccount { .. } => "FreezeTokenAccount",
            Self::ThawTokenAccount { .. } => "ThawTokenAccount",
            Self::SetMintAuthority { .. } => "SetMintAuthority",
            Self::CreateRewardsEpoch { .. } => "CreateRewardsEpoch",
            Self::ClaimRewards { .. } => "ClaimRewards",
        }
    }
}
