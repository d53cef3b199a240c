#![allow(dead_code)]

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::UpgradeableLoaderState;
use vault_stake::context::{Invocation, ProgramAuthorities};
use vault_stake::custody::{TokenAccountRef, TokenCustody};
use vault_stake::error::VaultStakeErrorCode;
use vault_stake::instruction::VaultStakeInstruction;
use vault_stake::merkle::{hash_sorted_pair, leaf_hash, Hash32};
use vault_stake::token_ledger::TokenLedger;
use vault_stake::VaultStakeProgram;

pub const START_TS: i64 = 1_700_000_000;
pub const UNBONDING_PERIOD: i64 = 7 * 24 * 60 * 60;

#[allow(deprecated)]
pub fn program_data(upgrade_authority: Option<Pubkey>) -> Vec<u8> {
    bincode::serialize(&UpgradeableLoaderState::ProgramData {
        slot: 1,
        upgrade_authority_address: upgrade_authority,
    })
    .unwrap()
}

pub fn assert_error(result: Result<()>, expected: VaultStakeErrorCode) {
    let err: Error = result.expect_err("call should have failed");
    assert_eq!(
        VaultStakeErrorCode::from_error(&err),
        Some(expected),
        "unexpected error: {err:?}"
    );
}

pub struct TestEnv {
    pub program: VaultStakeProgram,
    pub ledger: TokenLedger,
    pub authorities: ProgramAuthorities,
    pub deployer: Pubkey,
    pub freeze_admin: Pubkey,
    pub rewards_admin: Pubkey,
    pub vault_mint: Pubkey,
    pub stake_mint: Pubkey,
    pub now: i64,
}

impl TestEnv {
    /// Mints exist and the program is deployed, but not initialized.
    pub fn deployed() -> Self {
        let authorities = ProgramAuthorities::derive();
        let deployer = Pubkey::new_unique();
        let vault_mint = Pubkey::new_unique();
        let stake_mint = Pubkey::new_unique();

        let mut ledger = TokenLedger::new();
        ledger.create_mint(vault_mint, Some(Pubkey::new_unique()), None, 6);
        ledger.create_mint(
            stake_mint,
            Some(authorities.mint_authority),
            Some(authorities.freeze_authority),
            6,
        );

        Self {
            program: VaultStakeProgram::new(program_data(Some(deployer))),
            ledger,
            authorities,
            deployer,
            freeze_admin: Pubkey::new_unique(),
            rewards_admin: Pubkey::new_unique(),
            vault_mint,
            stake_mint,
            now: START_TS,
        }
    }

    pub fn initialized() -> Self {
        let mut env = Self::deployed();
        let ix = env.initialize_ix(UNBONDING_PERIOD);
        env.exec(env.deployer, ix).unwrap();
        env
    }

    pub fn initialize_ix(&self, unbonding_period: i64) -> VaultStakeInstruction {
        VaultStakeInstruction::Initialize {
            vault_mint: self.vault_mint,
            stake_mint: self.stake_mint,
            unbonding_period,
            freeze_administrators: vec![self.freeze_admin],
            rewards_administrators: vec![self.rewards_admin],
        }
    }

    pub fn exec(&mut self, signer: Pubkey, ix: VaultStakeInstruction) -> Result<()> {
        self.exec_events(signer, ix).map(|_| ())
    }

    /// Like `exec`, returning the encoded events the call logged.
    pub fn exec_events(
        &mut self,
        signer: Pubkey,
        ix: VaultStakeInstruction,
    ) -> Result<Vec<Vec<u8>>> {
        self.program
            .process(&mut self.ledger, Invocation::new(signer, self.now), ix)
    }

    /// A fresh holder funded with vault tokens.
    pub fn holder(&mut self, vault_tokens: u64) -> Pubkey {
        let holder = Pubkey::new_unique();
        if vault_tokens > 0 {
            self.ledger
                .airdrop(TokenAccountRef::new(holder, self.vault_mint), vault_tokens)
                .unwrap();
        }
        holder
    }

    pub fn advance(&mut self, seconds: i64) {
        self.now += seconds;
    }

    pub fn vault_balance(&self, owner: &Pubkey) -> u64 {
        self.ledger
            .balance(&TokenAccountRef::new(*owner, self.vault_mint))
    }

    pub fn stake_balance(&self, owner: &Pubkey) -> u64 {
        self.ledger
            .balance(&TokenAccountRef::new(*owner, self.stake_mint))
    }

    pub fn custody_balance(&self) -> u64 {
        self.vault_balance(&self.authorities.vault_authority)
    }

    pub fn escrow_balance(&self) -> u64 {
        self.stake_balance(&self.authorities.escrow_authority)
    }

    pub fn stake_supply(&self) -> u64 {
        self.ledger.supply(&self.stake_mint)
    }

    pub fn stake_account(&self, owner: &Pubkey) -> TokenAccountRef {
        TokenAccountRef::new(*owner, self.stake_mint)
    }
}

/// Decodes an event logged as discriminator followed by borsh data.
pub fn decode_event<E: anchor_lang::Event>(data: &[u8]) -> Option<E> {
    let body = data.strip_prefix(E::DISCRIMINATOR)?;
    E::try_from_slice(body).ok()
}

/// Off-ledger tree builder using the same sorted-pair rule as the program.
/// An unpaired node is carried up to the next layer unchanged.
pub struct RewardsTree {
    layers: Vec<Vec<Hash32>>,
}

impl RewardsTree {
    pub fn new(allocations: &[(Pubkey, u64)], epoch_index: u64) -> Self {
        let leaves: Vec<Hash32> = allocations
            .iter()
            .map(|(user, amount)| leaf_hash(user, *amount, epoch_index))
            .collect();
        let mut layers = vec![leaves];
        while layers.last().map_or(false, |layer| layer.len() > 1) {
            let next = layers
                .last()
                .unwrap()
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => hash_sorted_pair(a, b),
                    [a] => *a,
                    _ => unreachable!(),
                })
                .collect();
            layers.push(next);
        }
        Self { layers }
    }

    pub fn root(&self) -> Hash32 {
        self.layers.last().unwrap()[0]
    }

    pub fn proof(&self, mut index: usize) -> Vec<Hash32> {
        let mut proof = Vec::new();
        for layer in &self.layers[..self.layers.len() - 1] {
            if let Some(sibling) = layer.get(index ^ 1) {
                proof.push(*sibling);
            }
            index /= 2;
        }
        proof
    }
}
