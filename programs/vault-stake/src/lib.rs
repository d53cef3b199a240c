//! # vault stake - Token Staking Ledger
//!
//! ## Business Process Flow
//!
//! 1. Initial Setup:
//!    - Admin creates two token types: Vault (wYLDS), Stake (PRIME)
//!    - The upgrade authority initializes the ledger with both mints, the
//!      unbonding period, and the freeze and rewards administrator lists
//!
//! 2. User Staking Flow:
//!    - User deposits vault tokens (wYLDS) into the program vault account
//!    - User receives the same amount of stake tokens (PRIME)
//!
//! 3. Withdrawal Flow:
//!    a. Unbonding Initiation:
//!       - User moves stake tokens (PRIME) into the unbonding escrow
//!       - System opens an unbonding ticket for the user; the clock starts
//!
//!    b. Waiting Period:
//!       - One ticket per user; the remaining time can be queried
//!
//!    c. Redemption:
//!       - After the unbonding period, the escrowed stake tokens are burned
//!       - Original vault tokens (wYLDS) are returned to the user
//!       - The unbonding ticket is closed
//!
//! 4. Rewards:
//!    - Rewards administrators publish a merkle root per epoch
//!    - Users claim their allocation once per epoch with a merkle proof
//!
//! 5. Administrative Functions:
//!    - Pause/unpause, unbonding period, administrator lists
//!    - Freeze/thaw stake token accounts
//!    - Hand over the stake mint authority
//!
//! Every call runs against a unit of work: record writes are staged, token
//! movements are queued, and both commit together only if the call succeeds.
pub mod context;
pub mod custody;
pub mod error;
pub mod events;
pub mod guard;
pub mod instruction;
pub mod merkle;
pub mod processor;
pub mod state;
pub mod store;
pub mod token_ledger;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::log::sol_log_data;
use context::{ExecutionContext, Invocation};
use custody::TokenCustody;
use instruction::VaultStakeInstruction;
use state::{Config, RewardsEpoch, UnbondingTicket};
use store::{LedgerStore, RecordKey, UnitOfWork};

declare_id!("5wQQtGmmsT8W4nScZFeA9kun4roD3Q7BGQvo9LQ8WDFu");

/// Where a holder's exit stands at a given moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnbondingStatus {
    pub requested_amount: u64,
    pub start_ts: i64,
    pub matures_at: i64,
    /// Zero once the ticket can be redeemed.
    pub remaining_seconds: i64,
}

/// Entry point: routes each call to the processor and commits its effects.
#[derive(Clone, Debug, Default)]
pub struct VaultStakeProgram {
    store: LedgerStore,
    program_data: Vec<u8>,
}

impl VaultStakeProgram {
    /// `program_data` is the loader's program-data record; its upgrade
    /// authority is the deploy authority.
    pub fn new(program_data: Vec<u8>) -> Self {
        Self {
            store: LedgerStore::new(),
            program_data,
        }
    }

    pub fn set_program_data(&mut self, program_data: Vec<u8>) {
        self.program_data = program_data;
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Decodes a borsh-encoded instruction and processes it.
    pub fn process_instruction(
        &mut self,
        custody: &mut dyn TokenCustody,
        invocation: Invocation,
        data: &[u8],
    ) -> Result<Vec<Vec<u8>>> {
        let instruction = VaultStakeInstruction::try_from_slice(data)
            .map_err(|_| anchor_lang::error::ErrorCode::InstructionDidNotDeserialize)?;
        self.process(custody, invocation, instruction)
    }

    /// Runs one instruction. On error nothing is committed: neither the
    /// staged records nor the queued custody operations, and no event is
    /// logged.
    ///
    /// Returns the events of the call in order, each encoded as
    /// discriminator followed by borsh data, as `emit!` would log them.
    pub fn process(
        &mut self,
        custody: &mut dyn TokenCustody,
        invocation: Invocation,
        instruction: VaultStakeInstruction,
    ) -> Result<Vec<Vec<u8>>> {
        #[cfg(not(feature = "no-log-ix-name"))]
        msg!("Instruction: {}", instruction.name());

        let mut ctx = ExecutionContext::new(
            invocation,
            UnitOfWork::new(&self.store),
            &*custody,
            &self.program_data,
        );
        dispatch(&mut ctx, instruction)?;
        let staged = ctx.finish();

        custody.execute(&staged.effects)?;
        self.store.apply(staged.delta);
        for data in &staged.events {
            sol_log_data(&[data.as_slice()]);
        }
        Ok(staged.events)
    }

    pub fn config(&self) -> Result<Option<Config>> {
        self.store.load(&RecordKey::Config)
    }

    pub fn ticket(&self, owner: &Pubkey) -> Result<Option<UnbondingTicket>> {
        self.store.load(&RecordKey::Ticket(*owner))
    }

    pub fn epoch(&self, index: u64) -> Result<Option<RewardsEpoch>> {
        self.store.load(&RecordKey::Epoch(index))
    }

    pub fn has_claimed(&self, epoch_index: u64, user: &Pubkey) -> bool {
        self.store.exists(&RecordKey::Claim {
            epoch_index,
            user: *user,
        })
    }

    pub fn unbonding_status(&self, owner: &Pubkey, now: i64) -> Result<Option<UnbondingStatus>> {
        let Some(ticket) = self.ticket(owner)? else {
            return Ok(None);
        };
        let config = self
            .config()?
            .ok_or(error::VaultStakeErrorCode::NotInitialized)?;
        let matures_at = ticket
            .matures_at(config.unbonding_period)
            .ok_or(error::VaultStakeErrorCode::MathOverflow)?;
        Ok(Some(UnbondingStatus {
            requested_amount: ticket.requested_amount,
            start_ts: ticket.start_ts,
            matures_at,
            remaining_seconds: matures_at.saturating_sub(now).max(0),
        }))
    }
}

fn dispatch(ctx: &mut ExecutionContext, instruction: VaultStakeInstruction) -> Result<()> {
    match instruction {
        VaultStakeInstruction::Initialize {
            vault_mint,
            stake_mint,
            unbonding_period,
            freeze_administrators,
            rewards_administrators,
        } => processor::initialize(
            ctx,
            vault_mint,
            stake_mint,
            unbonding_period,
            freeze_administrators,
            rewards_administrators,
        ),
        VaultStakeInstruction::Pause { pause } => processor::pause(ctx, pause),
        VaultStakeInstruction::UpdateConfig {
            new_unbonding_period,
        } => processor::update_config(ctx, new_unbonding_period),
        VaultStakeInstruction::Deposit { amount } => processor::deposit(ctx, amount),
        VaultStakeInstruction::Unbond { amount } => processor::unbond(ctx, amount),
        VaultStakeInstruction::Redeem => processor::redeem(ctx),
        VaultStakeInstruction::UpdateFreezeAdministrators { new_administrators } => {
            processor::update_freeze_administrators(ctx, new_administrators)
        }
        VaultStakeInstruction::UpdateRewardsAdministrators { new_administrators } => {
            processor::update_rewards_administrators(ctx, new_administrators)
        }
        VaultStakeInstruction::FreezeTokenAccount { token_account } => {
            processor::freeze_token_account(ctx, token_account)
        }
        VaultStakeInstruction::ThawTokenAccount { token_account } => {
            processor::thaw_token_account(ctx, token_account)
        }
        VaultStakeInstruction::SetMintAuthority { new_authority } => {
            processor::set_mint_authority(ctx, new_authority)
        }
        VaultStakeInstruction::CreateRewardsEpoch {
            index,
            merkle_root,
            total,
        } => processor::create_rewards_epoch(ctx, index, merkle_root, total),
        VaultStakeInstruction::ClaimRewards {
            epoch_index,
            amount,
            proof,
        } => processor::claim_rewards(ctx, epoch_index, amount, proof),
    }
}
