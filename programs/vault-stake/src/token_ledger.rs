//! In-memory custodian built on the SPL token state model. Hosts embedding the
//! ledger without a real token program use it, and so do the tests.

use crate::custody::{CustodyOp, TokenAccountRef, TokenCustody};
use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::error::TokenError;
use anchor_spl::token::spl_token::solana_program::program_option::COption;
use anchor_spl::token::spl_token::state::{
    Account as SplTokenAccount, AccountState, Mint as SplMint,
};
use std::collections::BTreeMap;

fn token_error(err: TokenError) -> Error {
    ProgramError::from(err).into()
}

#[derive(Clone, Debug, Default)]
pub struct TokenLedger {
    mints: BTreeMap<Pubkey, SplMint>,
    accounts: BTreeMap<TokenAccountRef, SplTokenAccount>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_mint(
        &mut self,
        mint: Pubkey,
        mint_authority: Option<Pubkey>,
        freeze_authority: Option<Pubkey>,
        decimals: u8,
    ) {
        self.mints.insert(
            mint,
            SplMint {
                mint_authority: mint_authority.into(),
                supply: 0,
                decimals,
                is_initialized: true,
                freeze_authority: freeze_authority.into(),
            },
        );
    }

    pub fn supply(&self, mint: &Pubkey) -> u64 {
        self.mints.get(mint).map_or(0, |m| m.supply)
    }

    pub fn mint_authority(&self, mint: &Pubkey) -> Option<Pubkey> {
        match self.mints.get(mint)?.mint_authority {
            COption::Some(authority) => Some(authority),
            COption::None => None,
        }
    }

    pub fn token_account(&self, account: &TokenAccountRef) -> Option<&SplTokenAccount> {
        self.accounts.get(account)
    }

    /// Issues tokens outside of any program call, e.g. bootstrapping a
    /// holder's vault-asset balance.
    pub fn airdrop(&mut self, to: TokenAccountRef, amount: u64) -> Result<()> {
        let mint = self
            .mints
            .get_mut(&to.mint)
            .ok_or_else(|| token_error(TokenError::UninitializedState))?;
        mint.supply = mint
            .supply
            .checked_add(amount)
            .ok_or_else(|| token_error(TokenError::Overflow))?;
        let account = self.open_account(&to)?;
        account.amount = account
            .amount
            .checked_add(amount)
            .ok_or_else(|| token_error(TokenError::Overflow))?;
        Ok(())
    }

    fn open_account(&mut self, account: &TokenAccountRef) -> Result<&mut SplTokenAccount> {
        if !self.mints.contains_key(&account.mint) {
            return Err(token_error(TokenError::UninitializedState));
        }
        Ok(self.accounts.entry(*account).or_insert_with(|| SplTokenAccount {
            mint: account.mint,
            owner: account.owner,
            state: AccountState::Initialized,
            ..SplTokenAccount::default()
        }))
    }

    fn existing_account(&mut self, account: &TokenAccountRef) -> Result<&mut SplTokenAccount> {
        self.accounts
            .get_mut(account)
            .ok_or_else(|| token_error(TokenError::UninitializedState))
    }

    fn existing_mint(&mut self, mint: &Pubkey) -> Result<&mut SplMint> {
        self.mints
            .get_mut(mint)
            .ok_or_else(|| token_error(TokenError::UninitializedState))
    }

    fn ensure_not_frozen(&self, account: &TokenAccountRef) -> Result<()> {
        if self.is_frozen(account) {
            return Err(token_error(TokenError::AccountFrozen));
        }
        Ok(())
    }

    fn debit(&mut self, from: &TokenAccountRef, authority: &Pubkey, amount: u64) -> Result<()> {
        self.ensure_not_frozen(from)?;
        let source = self.existing_account(from)?;
        if source.owner != *authority {
            return Err(token_error(TokenError::OwnerMismatch));
        }
        source.amount = source
            .amount
            .checked_sub(amount)
            .ok_or_else(|| token_error(TokenError::InsufficientFunds))?;
        Ok(())
    }

    fn credit(&mut self, to: &TokenAccountRef, amount: u64) -> Result<()> {
        self.ensure_not_frozen(to)?;
        let destination = self.open_account(to)?;
        destination.amount = destination
            .amount
            .checked_add(amount)
            .ok_or_else(|| token_error(TokenError::Overflow))?;
        Ok(())
    }

    fn set_state(
        &mut self,
        account: &TokenAccountRef,
        authority: &Pubkey,
        from: AccountState,
        to: AccountState,
    ) -> Result<()> {
        let mint = self.existing_mint(&account.mint)?;
        match mint.freeze_authority {
            COption::None => return Err(token_error(TokenError::MintCannotFreeze)),
            COption::Some(freeze_authority) if freeze_authority != *authority => {
                return Err(token_error(TokenError::OwnerMismatch))
            }
            COption::Some(_) => {}
        }
        let target = self.existing_account(account)?;
        if target.state != from {
            return Err(token_error(TokenError::InvalidState));
        }
        target.state = to;
        Ok(())
    }

    fn apply(&mut self, op: &CustodyOp) -> Result<()> {
        match op {
            CustodyOp::Transfer {
                from,
                to,
                authority,
                amount,
            } => {
                if from.mint != to.mint {
                    return Err(token_error(TokenError::MintMismatch));
                }
                self.debit(from, authority, *amount)?;
                self.credit(to, *amount)
            }
            CustodyOp::MintTo {
                to,
                authority,
                amount,
            } => {
                let mint = self.existing_mint(&to.mint)?;
                match mint.mint_authority {
                    COption::None => return Err(token_error(TokenError::FixedSupply)),
                    COption::Some(mint_authority) if mint_authority != *authority => {
                        return Err(token_error(TokenError::OwnerMismatch))
                    }
                    COption::Some(_) => {}
                }
                mint.supply = mint
                    .supply
                    .checked_add(*amount)
                    .ok_or_else(|| token_error(TokenError::Overflow))?;
                self.credit(to, *amount)
            }
            CustodyOp::Burn {
                from,
                authority,
                amount,
            } => {
                self.debit(from, authority, *amount)?;
                let mint = self.existing_mint(&from.mint)?;
                mint.supply = mint
                    .supply
                    .checked_sub(*amount)
                    .ok_or_else(|| token_error(TokenError::Overflow))?;
                Ok(())
            }
            CustodyOp::Freeze { account, authority } => self.set_state(
                account,
                authority,
                AccountState::Initialized,
                AccountState::Frozen,
            ),
            CustodyOp::Thaw { account, authority } => self.set_state(
                account,
                authority,
                AccountState::Frozen,
                AccountState::Initialized,
            ),
            CustodyOp::SetMintAuthority {
                mint,
                current_authority,
                new_authority,
            } => {
                let mint = self.existing_mint(mint)?;
                match mint.mint_authority {
                    COption::None => return Err(token_error(TokenError::FixedSupply)),
                    COption::Some(authority) if authority != *current_authority => {
                        return Err(token_error(TokenError::OwnerMismatch))
                    }
                    COption::Some(_) => {}
                }
                mint.mint_authority = (*new_authority).into();
                Ok(())
            }
        }
    }
}

impl TokenCustody for TokenLedger {
    fn balance(&self, account: &TokenAccountRef) -> u64 {
        self.accounts.get(account).map_or(0, |a| a.amount)
    }

    fn is_frozen(&self, account: &TokenAccountRef) -> bool {
        self.accounts
            .get(account)
            .map_or(false, |a| a.state == AccountState::Frozen)
    }

    fn execute(&mut self, ops: &[CustodyOp]) -> Result<()> {
        let mut working = self.clone();
        for op in ops {
            working.apply(op)?;
        }
        *self = working;
        Ok(())
    }
}
