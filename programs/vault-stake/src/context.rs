use crate::custody::{CustodyOp, TokenAccountRef, TokenCustody};
use crate::error::VaultStakeErrorCode;
use crate::guard::{self, Role};
use crate::state::Config;
use crate::store::{RecordKey, StoreDelta, UnitOfWork};
use anchor_lang::prelude::*;

/// Who is calling, and when. The timestamp is supplied by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub signer: Pubkey,
    pub now: i64,
}

impl Invocation {
    pub fn new(signer: Pubkey, now: i64) -> Self {
        Self { signer, now }
    }
}

/// Program-derived authorities. Nobody holds a key for them; custody honors
/// them only on behalf of this program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramAuthorities {
    /// Owns the token account holding deposited vault tokens.
    pub vault_authority: Pubkey,
    pub mint_authority: Pubkey,
    pub freeze_authority: Pubkey,
    /// Owns the escrow holding stake tokens reserved by open tickets.
    pub escrow_authority: Pubkey,
}

impl ProgramAuthorities {
    pub fn derive() -> Self {
        let pda = |seed: &[u8]| Pubkey::find_program_address(&[seed], &crate::ID).0;
        Self {
            vault_authority: pda(b"vault_authority"),
            mint_authority: pda(b"mint_authority"),
            freeze_authority: pda(b"freeze_authority"),
            escrow_authority: pda(b"unbonding_escrow"),
        }
    }

    pub fn vault_account(&self, config: &Config) -> TokenAccountRef {
        TokenAccountRef::new(self.vault_authority, config.vault_mint)
    }

    pub fn escrow_account(&self, config: &Config) -> TokenAccountRef {
        TokenAccountRef::new(self.escrow_authority, config.stake_mint)
    }

    pub fn owns(&self, owner: &Pubkey) -> bool {
        [
            self.vault_authority,
            self.mint_authority,
            self.freeze_authority,
            self.escrow_authority,
        ]
        .contains(owner)
    }
}

/// Everything one instruction may read or stage. Nothing staged here is
/// visible outside until the dispatcher commits it.
pub struct ExecutionContext<'a> {
    pub invocation: Invocation,
    pub authorities: ProgramAuthorities,
    pub store: UnitOfWork<'a>,
    pub custody: &'a dyn TokenCustody,
    program_data: &'a [u8],
    effects: Vec<CustodyOp>,
    events: Vec<Vec<u8>>,
}

/// What a successful call leaves behind for the dispatcher to commit.
pub struct Staged {
    pub delta: StoreDelta,
    pub effects: Vec<CustodyOp>,
    /// Encoded events, logged only after the commit.
    pub events: Vec<Vec<u8>>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        invocation: Invocation,
        store: UnitOfWork<'a>,
        custody: &'a dyn TokenCustody,
        program_data: &'a [u8],
    ) -> Self {
        Self {
            invocation,
            authorities: ProgramAuthorities::derive(),
            store,
            custody,
            program_data,
            effects: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn signer(&self) -> Pubkey {
        self.invocation.signer
    }

    pub fn now(&self) -> i64 {
        self.invocation.now
    }

    pub fn config(&self) -> Result<Config> {
        self.store
            .load::<Config>(&RecordKey::Config)?
            .ok_or_else(|| VaultStakeErrorCode::NotInitialized.into())
    }

    pub fn require_role(&self, role: Role, config: Option<&Config>) -> Result<()> {
        guard::require_role(role, &self.invocation.signer, config, self.program_data)
    }

    pub fn user_account(&self, mint: Pubkey) -> TokenAccountRef {
        TokenAccountRef::new(self.invocation.signer, mint)
    }

    /// Queues a custody operation; it runs only if the whole call succeeds.
    pub fn push(&mut self, op: CustodyOp) {
        self.effects.push(op);
    }

    /// Queues an event; see [`Staged::events`].
    pub fn emit<E: anchor_lang::Event>(&mut self, event: E) {
        self.events.push(event.data());
    }

    pub fn finish(self) -> Staged {
        Staged {
            delta: self.store.into_delta(),
            effects: self.effects,
            events: self.events,
        }
    }
}
