//! Asset custody seen from the program: token balances are read directly,
//! and every movement is requested as a [`CustodyOp`]. A call's operations
//! are handed over as one batch, which the custodian applies entirely or not
//! at all.

use anchor_lang::prelude::*;

/// Token holdings are addressed by owner and mint.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAccountRef {
    pub owner: Pubkey,
    pub mint: Pubkey,
}

impl TokenAccountRef {
    pub fn new(owner: Pubkey, mint: Pubkey) -> Self {
        Self { owner, mint }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CustodyOp {
    Transfer {
        from: TokenAccountRef,
        to: TokenAccountRef,
        authority: Pubkey,
        amount: u64,
    },
    MintTo {
        to: TokenAccountRef,
        authority: Pubkey,
        amount: u64,
    },
    Burn {
        from: TokenAccountRef,
        authority: Pubkey,
        amount: u64,
    },
    Freeze {
        account: TokenAccountRef,
        authority: Pubkey,
    },
    Thaw {
        account: TokenAccountRef,
        authority: Pubkey,
    },
    SetMintAuthority {
        mint: Pubkey,
        current_authority: Pubkey,
        new_authority: Option<Pubkey>,
    },
}

pub trait TokenCustody {
    fn balance(&self, account: &TokenAccountRef) -> u64;

    fn is_frozen(&self, account: &TokenAccountRef) -> bool;

    /// Applies the whole batch, or nothing if any operation fails.
    fn execute(&mut self, ops: &[CustodyOp]) -> Result<()>;
}
