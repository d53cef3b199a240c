//! Ledger store: records addressed by seeds, the way program-derived
//! accounts are. An address is computable before its record exists, and a
//! record only comes into being through an explicit create-if-absent.

use crate::error::VaultStakeErrorCode;
use crate::state::{ClaimRecord, Config, LedgerRecord, RewardsEpoch, UnbondingTicket};
use anchor_lang::error::ErrorCode as AnchorErrorCode;
use anchor_lang::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKey {
    Config,
    Ticket(Pubkey),
    Epoch(u64),
    Claim { epoch_index: u64, user: Pubkey },
}

impl RecordKey {
    pub fn address(&self) -> Pubkey {
        match self {
            RecordKey::Config => {
                Pubkey::find_program_address(&[Config::SEED_PREFIX], &crate::ID).0
            }
            RecordKey::Ticket(owner) => Pubkey::find_program_address(
                &[UnbondingTicket::SEED_PREFIX, owner.as_ref()],
                &crate::ID,
            )
            .0,
            RecordKey::Epoch(index) => Pubkey::find_program_address(
                &[RewardsEpoch::SEED_PREFIX, index.to_le_bytes().as_ref()],
                &crate::ID,
            )
            .0,
            RecordKey::Claim { epoch_index, user } => {
                let epoch = RecordKey::Epoch(*epoch_index).address();
                Pubkey::find_program_address(
                    &[ClaimRecord::SEED_PREFIX, epoch.as_ref(), user.as_ref()],
                    &crate::ID,
                )
                .0
            }
        }
    }
}

/// Committed records, by address.
#[derive(Clone, Debug, Default)]
pub struct LedgerStore {
    records: BTreeMap<Pubkey, Vec<u8>>,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, key: &RecordKey) -> bool {
        self.records.contains_key(&key.address())
    }

    pub fn load<T: LedgerRecord>(&self, key: &RecordKey) -> Result<Option<T>> {
        self.records
            .get(&key.address())
            .map(|data| T::try_deserialize(&mut data.as_slice()))
            .transpose()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn apply(&mut self, delta: StoreDelta) {
        for (address, write) in delta.writes {
            match write {
                Some(data) => {
                    self.records.insert(address, data);
                }
                None => {
                    self.records.remove(&address);
                }
            }
        }
    }
}

/// Staged writes of one call. `None` marks a closed record.
#[derive(Debug, Default)]
pub struct StoreDelta {
    writes: BTreeMap<Pubkey, Option<Vec<u8>>>,
}

impl StoreDelta {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Reads through to the committed store, writes into a private delta.
/// Dropping it discards everything it staged.
pub struct UnitOfWork<'a> {
    base: &'a LedgerStore,
    delta: StoreDelta,
}

impl<'a> UnitOfWork<'a> {
    pub fn new(base: &'a LedgerStore) -> Self {
        Self {
            base,
            delta: StoreDelta::default(),
        }
    }

    fn raw(&self, address: &Pubkey) -> Option<&[u8]> {
        match self.delta.writes.get(address) {
            Some(staged) => staged.as_deref(),
            None => self.base.records.get(address).map(Vec::as_slice),
        }
    }

    pub fn exists(&self, key: &RecordKey) -> bool {
        self.raw(&key.address()).is_some()
    }

    pub fn load<T: LedgerRecord>(&self, key: &RecordKey) -> Result<Option<T>> {
        self.raw(&key.address())
            .map(|mut data| T::try_deserialize(&mut data))
            .transpose()
    }

    /// Creates the record only if nothing lives at its address yet;
    /// otherwise fails with `on_conflict`.
    pub fn create<T: LedgerRecord>(
        &mut self,
        key: &RecordKey,
        record: &T,
        on_conflict: VaultStakeErrorCode,
    ) -> Result<()> {
        let address = key.address();
        if self.raw(&address).is_some() {
            return Err(on_conflict.into());
        }
        let data = Self::encode(record)?;
        self.delta.writes.insert(address, Some(data));
        Ok(())
    }

    /// Overwrites an existing record.
    pub fn update<T: LedgerRecord>(&mut self, key: &RecordKey, record: &T) -> Result<()> {
        let address = key.address();
        require!(
            self.raw(&address).is_some(),
            AnchorErrorCode::AccountNotInitialized
        );
        let data = Self::encode(record)?;
        self.delta.writes.insert(address, Some(data));
        Ok(())
    }

    pub fn close(&mut self, key: &RecordKey) -> Result<()> {
        let address = key.address();
        require!(
            self.raw(&address).is_some(),
            AnchorErrorCode::AccountNotInitialized
        );
        self.delta.writes.insert(address, None);
        Ok(())
    }

    pub fn into_delta(self) -> StoreDelta {
        self.delta
    }

    fn encode<T: LedgerRecord>(record: &T) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(T::LEN);
        record.try_serialize(&mut data)?;
        require!(data.len() <= T::LEN, AnchorErrorCode::AccountDidNotSerialize);
        Ok(data)
    }
}
