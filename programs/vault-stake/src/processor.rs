use crate::context::ExecutionContext;
use crate::custody::{CustodyOp, TokenAccountRef};
use crate::error::*;
use crate::events::*;
use crate::guard::{require_not_paused, Role};
use crate::merkle::{self, Hash32};
use crate::state::{
    AdministratorSet, ClaimRecord, Config, RewardsEpoch, UnbondingTicket, MAX_PROOF_LEN,
    MAX_UNBONDING_PERIOD, MIN_UNBONDING_PERIOD,
};
use crate::store::RecordKey;
use anchor_lang::prelude::*;

fn validate_unbonding_period(unbonding_period: i64) -> Result<()> {
    require!(
        unbonding_period >= MIN_UNBONDING_PERIOD,
        VaultStakeErrorCode::InvalidBondingPeriod
    );
    require!(
        unbonding_period <= MAX_UNBONDING_PERIOD,
        VaultStakeErrorCode::InvalidBondingPeriod
    );
    Ok(())
}

pub fn initialize(
    ctx: &mut ExecutionContext,
    vault_mint: Pubkey,
    stake_mint: Pubkey,
    unbonding_period: i64,
    freeze_administrators: Vec<Pubkey>,
    rewards_administrators: Vec<Pubkey>,
) -> Result<()> {
    ctx.require_role(Role::DeployAuthority, None)?;
    let freeze_administrators = AdministratorSet::try_from_slice_checked(&freeze_administrators)?;
    let rewards_administrators =
        AdministratorSet::try_from_slice_checked(&rewards_administrators)?;
    validate_unbonding_period(unbonding_period)?;
    require!(
        vault_mint != stake_mint,
        VaultStakeErrorCode::VaultAndMintCannotBeSame
    );

    let config = Config {
        vault_mint,
        stake_mint,
        unbonding_period,
        freeze_administrators,
        rewards_administrators,
        paused: false,
    };
    ctx.store.create(
        &RecordKey::Config,
        &config,
        VaultStakeErrorCode::AlreadyInitialized,
    )?;

    msg!(
        "Initialized vault {} / stake {} with unbonding period {}s",
        vault_mint,
        stake_mint,
        unbonding_period
    );
    Ok(())
}

pub fn pause(ctx: &mut ExecutionContext, pause: bool) -> Result<()> {
    let mut config = ctx.config()?;
    ctx.require_role(Role::DeployAuthority, Some(&config))?;
    config.paused = pause;
    ctx.store.update(&RecordKey::Config, &config)?;

    msg!("Protocol paused: {}", pause);
    ctx.emit(PauseUpdated {
        admin: ctx.signer(),
        paused: pause,
    });
    Ok(())
}

pub fn update_config(ctx: &mut ExecutionContext, new_unbonding_period: i64) -> Result<()> {
    let mut config = ctx.config()?;
    ctx.require_role(Role::DeployAuthority, Some(&config))?;
    validate_unbonding_period(new_unbonding_period)?;

    let old_period = config.unbonding_period;
    config.unbonding_period = new_unbonding_period;
    ctx.store.update(&RecordKey::Config, &config)?;

    ctx.emit(UnbondingPeriodUpdated {
        admin: ctx.signer(),
        old_period,
        new_period: new_unbonding_period,
        mint: config.stake_mint,
        vault: config.vault_mint,
    });
    Ok(())
}

pub fn deposit(ctx: &mut ExecutionContext, amount: u64) -> Result<()> {
    require!(amount > 0, VaultStakeErrorCode::InvalidAmount);
    let config = ctx.config()?;
    require_not_paused(&config)?;
    ctx.require_role(Role::Holder(ctx.signer()), Some(&config))?;

    let user_vault_account = ctx.user_account(config.vault_mint);
    require!(
        ctx.custody.balance(&user_vault_account) >= amount,
        VaultStakeErrorCode::InsufficientBalance
    );

    let vault_account = ctx.authorities.vault_account(&config);
    let mint_authority = ctx.authorities.mint_authority;
    let user_stake_account = ctx.user_account(config.stake_mint);
    ctx.push(CustodyOp::Transfer {
        from: user_vault_account,
        to: vault_account,
        authority: ctx.signer(),
        amount,
    });
    ctx.push(CustodyOp::MintTo {
        to: user_stake_account,
        authority: mint_authority,
        amount,
    });

    ctx.emit(DepositEvent {
        user: ctx.signer(),
        amount,
        mint: config.stake_mint,
        vault: vault_account.owner,
    });
    Ok(())
}

/// Reserves `amount` stake tokens in escrow and starts the unbonding clock.
/// The tokens are burned only when the ticket is redeemed.
pub fn unbond(ctx: &mut ExecutionContext, amount: u64) -> Result<()> {
    require!(amount > 0, VaultStakeErrorCode::InvalidAmount);
    let config = ctx.config()?;
    require_not_paused(&config)?;
    ctx.require_role(Role::Holder(ctx.signer()), Some(&config))?;
    let start_ts = ctx.now();
    require!(start_ts > 0, VaultStakeErrorCode::InvalidTimestamp);

    let owner = ctx.signer();
    let user_stake_account = ctx.user_account(config.stake_mint);
    require!(
        amount <= ctx.custody.balance(&user_stake_account),
        VaultStakeErrorCode::InsufficientUnbondingBalance
    );

    let ticket = UnbondingTicket {
        owner,
        requested_amount: amount,
        start_ts,
    };
    ctx.store.create(
        &RecordKey::Ticket(owner),
        &ticket,
        VaultStakeErrorCode::TicketAlreadyExists,
    )?;

    let escrow_account = ctx.authorities.escrow_account(&config);
    ctx.push(CustodyOp::Transfer {
        from: user_stake_account,
        to: escrow_account,
        authority: owner,
        amount,
    });

    ctx.emit(UnbondEvent {
        user: owner,
        amount,
        start_ts,
        mint: config.stake_mint,
        vault: config.vault_mint,
    });
    Ok(())
}

pub fn redeem(ctx: &mut ExecutionContext) -> Result<()> {
    let config = ctx.config()?;
    require_not_paused(&config)?;

    let ticket_key = RecordKey::Ticket(ctx.signer());
    let ticket: UnbondingTicket = ctx
        .store
        .load(&ticket_key)?
        .ok_or(VaultStakeErrorCode::NoActiveTicket)?;
    ctx.require_role(Role::Holder(ticket.owner), Some(&config))?;

    require!(
        ticket.is_matured(config.unbonding_period, ctx.now()),
        VaultStakeErrorCode::UnbondingPeriodNotElapsed
    );

    let amount = ticket.requested_amount;
    let vault_account = ctx.authorities.vault_account(&config);
    require!(
        ctx.custody.balance(&vault_account) >= amount,
        VaultStakeErrorCode::InsufficientVaultBalance
    );

    let escrow_account = ctx.authorities.escrow_account(&config);
    let user_vault_account = ctx.user_account(config.vault_mint);
    ctx.push(CustodyOp::Burn {
        from: escrow_account,
        authority: escrow_account.owner,
        amount,
    });
    ctx.push(CustodyOp::Transfer {
        from: vault_account,
        to: user_vault_account,
        authority: vault_account.owner,
        amount,
    });
    ctx.store.close(&ticket_key)?;

    ctx.emit(RedeemEvent {
        user: ctx.signer(),
        amount,
        mint: config.stake_mint,
        vault: vault_account.owner,
    });
    Ok(())
}

pub fn update_freeze_administrators(
    ctx: &mut ExecutionContext,
    new_administrators: Vec<Pubkey>,
) -> Result<()> {
    let mut config = ctx.config()?;
    ctx.require_role(Role::DeployAuthority, Some(&config))?;

    config.freeze_administrators = AdministratorSet::try_from_slice_checked(&new_administrators)?;
    ctx.store.update(&RecordKey::Config, &config)?;

    msg!(
        "Freeze administrators updated. New count: {}",
        config.freeze_administrators.len()
    );
    ctx.emit(AdministratorsUpdated {
        admin: ctx.signer(),
        role: AdministratorRole::Freeze,
        administrators: new_administrators,
    });
    Ok(())
}

pub fn update_rewards_administrators(
    ctx: &mut ExecutionContext,
    new_administrators: Vec<Pubkey>,
) -> Result<()> {
    let mut config = ctx.config()?;
    ctx.require_role(Role::DeployAuthority, Some(&config))?;

    config.rewards_administrators = AdministratorSet::try_from_slice_checked(&new_administrators)?;
    ctx.store.update(&RecordKey::Config, &config)?;

    msg!(
        "Rewards administrators updated. New count: {}",
        config.rewards_administrators.len()
    );
    ctx.emit(AdministratorsUpdated {
        admin: ctx.signer(),
        role: AdministratorRole::Rewards,
        administrators: new_administrators,
    });
    Ok(())
}

// Only holder accounts of the stake mint. The escrow and vault accounts are
// owned by program authorities and must stay movable for redeem and unbond.
fn validate_freeze_target(
    ctx: &ExecutionContext,
    config: &Config,
    token_account: &TokenAccountRef,
) -> Result<()> {
    require_keys_eq!(
        token_account.mint,
        config.stake_mint,
        VaultStakeErrorCode::InvalidMint
    );
    require!(
        !ctx.authorities.owns(&token_account.owner),
        VaultStakeErrorCode::ProgramOwnedAccount
    );
    Ok(())
}

// Freezing goes through the program's freeze authority PDA, which only the
// stake mint delegates to.
pub fn freeze_token_account(ctx: &mut ExecutionContext, token_account: TokenAccountRef) -> Result<()> {
    let config = ctx.config()?;
    ctx.require_role(Role::FreezeAdministrator, Some(&config))?;
    validate_freeze_target(ctx, &config, &token_account)?;

    let freeze_authority = ctx.authorities.freeze_authority;
    ctx.push(CustodyOp::Freeze {
        account: token_account,
        authority: freeze_authority,
    });

    msg!(
        "Token account {}/{} frozen by administrator {}",
        token_account.owner,
        token_account.mint,
        ctx.signer()
    );
    ctx.emit(TokenAccountFrozen {
        admin: ctx.signer(),
        owner: token_account.owner,
        mint: token_account.mint,
    });
    Ok(())
}

pub fn thaw_token_account(ctx: &mut ExecutionContext, token_account: TokenAccountRef) -> Result<()> {
    let config = ctx.config()?;
    ctx.require_role(Role::FreezeAdministrator, Some(&config))?;
    validate_freeze_target(ctx, &config, &token_account)?;

    let freeze_authority = ctx.authorities.freeze_authority;
    ctx.push(CustodyOp::Thaw {
        account: token_account,
        authority: freeze_authority,
    });

    msg!(
        "Token account {}/{} thawed by administrator {}",
        token_account.owner,
        token_account.mint,
        ctx.signer()
    );
    ctx.emit(TokenAccountThawed {
        admin: ctx.signer(),
        owner: token_account.owner,
        mint: token_account.mint,
    });
    Ok(())
}

/// Hands issuance of the stake token to `new_authority`, e.g. when migrating
/// to a new program. Deposits and claims fail afterwards.
pub fn set_mint_authority(ctx: &mut ExecutionContext, new_authority: Pubkey) -> Result<()> {
    let config = ctx.config()?;
    ctx.require_role(Role::DeployAuthority, Some(&config))?;

    let mint_authority = ctx.authorities.mint_authority;
    ctx.push(CustodyOp::SetMintAuthority {
        mint: config.stake_mint,
        current_authority: mint_authority,
        new_authority: Some(new_authority),
    });

    ctx.emit(MintAuthorityUpdated {
        admin: ctx.signer(),
        mint: config.stake_mint,
        new_authority,
    });
    Ok(())
}

pub fn create_rewards_epoch(
    ctx: &mut ExecutionContext,
    index: u64,
    merkle_root: Hash32,
    total: u64,
) -> Result<()> {
    let config = ctx.config()?;
    ctx.require_role(Role::RewardsAdministrator, Some(&config))?;

    let epoch = RewardsEpoch {
        index,
        merkle_root,
        total,
        created_ts: ctx.now(),
    };
    ctx.store.create(
        &RecordKey::Epoch(index),
        &epoch,
        VaultStakeErrorCode::EpochAlreadyExists,
    )?;

    ctx.emit(RewardsEpochCreated {
        admin: ctx.signer(),
        index,
        merkle_root,
        total,
    });
    Ok(())
}

/// This is the classic "airdrop/claim per epoch" design:
/// - off-chain, the rewards administrator computes each user's reward, builds
///   a merkle tree of (user, amount, epoch_index) and publishes the root with
///   `create_rewards_epoch`
/// - here, the user presents (amount, proof); the proof is checked against
///   the epoch root, the claim record is created, and only then is the reward
///   minted, so a replay fails on the record before anything is minted
pub fn claim_rewards(
    ctx: &mut ExecutionContext,
    epoch_index: u64,
    amount: u64,
    proof: Vec<Hash32>,
) -> Result<()> {
    let config = ctx.config()?;
    require_not_paused(&config)?;
    ctx.require_role(Role::Holder(ctx.signer()), Some(&config))?;
    require!(amount > 0, VaultStakeErrorCode::InvalidAmount);
    require!(
        proof.len() <= MAX_PROOF_LEN,
        VaultStakeErrorCode::ProofTooLong
    );

    let epoch: RewardsEpoch = ctx
        .store
        .load(&RecordKey::Epoch(epoch_index))?
        .ok_or(VaultStakeErrorCode::EpochNotFound)?;

    let user = ctx.signer();
    let leaf = merkle::leaf_hash(&user, amount, epoch.index);
    require!(
        merkle::verify_proof(&epoch.merkle_root, leaf, &proof),
        VaultStakeErrorCode::InvalidMerkleProof
    );

    ctx.store.create(
        &RecordKey::Claim { epoch_index, user },
        &ClaimRecord {},
        VaultStakeErrorCode::RewardsAlreadyClaimed,
    )?;

    let mint_authority = ctx.authorities.mint_authority;
    let user_stake_account = ctx.user_account(config.stake_mint);
    ctx.push(CustodyOp::MintTo {
        to: user_stake_account,
        authority: mint_authority,
        amount,
    });

    ctx.emit(RewardsClaimed {
        user,
        epoch: epoch.index,
        amount,
        mint: config.stake_mint,
        vault: config.vault_mint,
    });
    Ok(())
}
