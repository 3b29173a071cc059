//! Remote-chain Neurons ledger state.
//!
//! Balances live in one `Holder` PDA per owner. Voting power is tracked as an
//! append-only list of (slot, votes) checkpoints per delegate, plus one list
//! for total supply, so any past slot can be answered by binary search over
//! the account bytes.

use anchor_lang::prelude::*;

use crate::errors::ProxyError;

pub const TOKEN_NAME: &str = "Neurons";
pub const TOKEN_SYMBOL: &str = "Neurons";
pub const MAX_NAME_LEN: usize = 32;

/// Single instance per program. Seeds: ["config"]
#[account]
#[derive(Default)]
pub struct ProxyConfig {
    /// May rotate the bridge authority.
    pub admin: Pubkey,
    /// Only key allowed to mint and burn.
    pub bridge: Pubkey,
    pub total_supply: u64,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub bump: u8,
}

impl ProxyConfig {
    pub const LEN: usize = 8 + 32 + 32 + 8 + (4 + MAX_NAME_LEN) + (4 + MAX_NAME_LEN) + 1 + 1;
}

/// Seeds: ["holder", owner]
#[account]
#[derive(Default)]
pub struct Holder {
    pub owner: Pubkey,
    pub balance: u64,
    /// Receives this holder's voting power. Set to `owner` on first credit.
    pub delegate: Pubkey,
    pub bump: u8,
}

impl Holder {
    pub const LEN: usize = 8 + 32 + 8 + 32 + 1;

    pub fn is_new(&self) -> bool {
        self.owner == Pubkey::default()
    }

    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.balance = self.balance.checked_add(amount).ok_or(ProxyError::MathOverflow)?;
        Ok(())
    }

    pub fn debit(&mut self, amount: u64) -> Result<()> {
        self.balance = self.balance.checked_sub(amount).ok_or(ProxyError::InsufficientBalance)?;
        Ok(())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checkpoint {
    pub slot: u64,
    pub value: u64,
}

impl Checkpoint {
    pub const SIZE: usize = 8 + 8;

    fn read(bytes: &[u8]) -> Self {
        let mut slot = [0u8; 8];
        let mut value = [0u8; 8];
        slot.copy_from_slice(&bytes[..8]);
        value.copy_from_slice(&bytes[8..Self::SIZE]);
        Self { slot: u64::from_le_bytes(slot), value: u64::from_le_bytes(value) }
    }

    fn write(&self, bytes: &mut [u8]) {
        bytes[..8].copy_from_slice(&self.slot.to_le_bytes());
        bytes[8..Self::SIZE].copy_from_slice(&self.value.to_le_bytes());
    }
}

/// Seeds: ["votes", delegate] or ["supply"]
///
/// Only this header is deserialized. `len` fixed-width entries follow it in
/// the raw account data and are searched and appended in place.
#[account]
#[derive(Default)]
pub struct Checkpoints {
    /// Delegate whose votes are tracked; default for the supply history.
    pub owner: Pubkey,
    pub bump: u8,
    pub len: u32,
}

impl Checkpoints {
    pub const HEADER_LEN: usize = 8 + 32 + 1 + 4;

    pub const fn space_for(entries: usize) -> usize {
        Self::HEADER_LEN + entries * Checkpoint::SIZE
    }

    /// Read-only view of the entries stored in `data`.
    pub fn history<'a>(&self, data: &'a [u8]) -> Result<CheckpointHistory<'a>> {
        let end = Self::space_for(self.len as usize);
        require!(data.len() >= end, ProxyError::CheckpointCapacity);
        Ok(CheckpointHistory { entries: &data[Self::HEADER_LEN..end] })
    }

    /// Writes `latest + amount` at the tail of `data`. Returns (previous, new).
    pub fn increase(&mut self, data: &mut [u8], amount: u64, slot: u64) -> Result<(u64, u64)> {
        let previous = self.history(data)?.latest();
        let new = previous.checked_add(amount).ok_or(ProxyError::MathOverflow)?;
        self.append(data, Checkpoint { slot, value: new })?;
        Ok((previous, new))
    }

    /// Writes `latest - amount` at the tail of `data`. Returns (previous, new).
    pub fn decrease(&mut self, data: &mut [u8], amount: u64, slot: u64) -> Result<(u64, u64)> {
        let previous = self.history(data)?.latest();
        let new = previous.checked_sub(amount).ok_or(ProxyError::MathOverflow)?;
        self.append(data, Checkpoint { slot, value: new })?;
        Ok((previous, new))
    }

    /// `data` must already be sized for one more entry.
    fn append(&mut self, data: &mut [u8], checkpoint: Checkpoint) -> Result<()> {
        if let Some(last) = self.history(data)?.last() {
            require!(checkpoint.slot >= last.slot, ProxyError::CheckpointOutOfOrder);
        }
        let len = self.len.checked_add(1).ok_or(ProxyError::MathOverflow)?;
        let end = Self::space_for(len as usize);
        require!(data.len() >= end, ProxyError::CheckpointCapacity);

        checkpoint.write(&mut data[end - Checkpoint::SIZE..end]);
        self.len = len;
        Ok(())
    }
}

/// Ordered (slot, value) entries borrowed from a checkpoint account.
pub struct CheckpointHistory<'a> {
    entries: &'a [u8],
}

impl CheckpointHistory<'static> {
    /// History of an account that was never created.
    pub const EMPTY: Self = CheckpointHistory { entries: &[] };
}

impl CheckpointHistory<'_> {
    pub fn len(&self) -> usize {
        self.entries.len() / Checkpoint::SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Checkpoint {
        let offset = index * Checkpoint::SIZE;
        Checkpoint::read(&self.entries[offset..offset + Checkpoint::SIZE])
    }

    pub fn last(&self) -> Option<Checkpoint> {
        self.len().checked_sub(1).map(|index| self.get(index))
    }

    pub fn latest(&self) -> u64 {
        self.last().map_or(0, |c| c.value)
    }

    /// Value as of `slot`: the last checkpoint at or before it.
    pub fn value_at(&self, slot: u64) -> u64 {
        let (mut low, mut high) = (0, self.len());
        while low < high {
            let mid = low + (high - low) / 2;
            if self.get(mid).slot <= slot {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        match low {
            0 => 0,
            _ => self.get(low - 1).value,
        }
    }

    /// Historical lookup; only settled slots can be queried.
    pub fn past_value(&self, slot: u64, current_slot: u64) -> Result<u64> {
        require!(slot < current_slot, ProxyError::FutureLookup);
        Ok(self.value_at(slot))
    }
}
