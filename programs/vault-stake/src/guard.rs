use crate::error::VaultStakeErrorCode;
use crate::state::Config;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;

/// Privilege an operation requires from its signer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Holds the program's upgrade authority.
    DeployAuthority,
    FreezeAdministrator,
    RewardsAdministrator,
    /// Owns the record the instruction refers to.
    Holder(Pubkey),
}

/// The deploy authority is whoever the loader's program-data record names as
/// upgrade authority.
#[allow(deprecated)]
pub fn validate_program_update_authority(program_data: &[u8], authority: &Pubkey) -> Result<()> {
    let loader_state = bincode::deserialize::<UpgradeableLoaderState>(program_data)
        .map_err(|_| VaultStakeErrorCode::InvalidProgramData)?;

    match loader_state {
        UpgradeableLoaderState::ProgramData {
            slot: _,
            upgrade_authority_address,
        } => match upgrade_authority_address {
            Some(update_authority) => {
                require_keys_eq!(
                    *authority,
                    update_authority,
                    VaultStakeErrorCode::InvalidUpgradeAuthority
                );
            }
            None => return Err(VaultStakeErrorCode::NoUpgradeAuthority.into()),
        },
        _ => return Err(VaultStakeErrorCode::InvalidProgramData.into()),
    }

    Ok(())
}

pub fn require_role(
    role: Role,
    signer: &Pubkey,
    config: Option<&Config>,
    program_data: &[u8],
) -> Result<()> {
    match role {
        Role::DeployAuthority => validate_program_update_authority(program_data, signer),
        Role::FreezeAdministrator => {
            let config = config.ok_or(VaultStakeErrorCode::NotInitialized)?;
            require!(
                config.freeze_administrators.contains(signer),
                VaultStakeErrorCode::UnauthorizedFreezeAdministrator
            );
            Ok(())
        }
        Role::RewardsAdministrator => {
            let config = config.ok_or(VaultStakeErrorCode::NotInitialized)?;
            require!(
                config.rewards_administrators.contains(signer),
                VaultStakeErrorCode::InvalidRewardsAdministrator
            );
            Ok(())
        }
        Role::Holder(owner) => {
            require_keys_eq!(owner, *signer, VaultStakeErrorCode::InvalidTicketOwner);
            Ok(())
        }
    }
}

/// Holder-facing operations stop while the protocol is paused.
pub fn require_not_paused(config: &Config) -> Result<()> {
    require!(!config.paused, VaultStakeErrorCode::ProtocolPaused);
    Ok(())
}
