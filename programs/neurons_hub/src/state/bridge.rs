//! Bridge adapter state.
//!
//! One `BridgeConfig` carries the global mode, pause switch and totals; each
//! remote chain has its own `RemoteChain` record holding its permission,
//! trusted remote encoding and per-chain counters. Global totals are only ever
//! changed together with a per-chain counter, so their sums always agree.

use anchor_lang::prelude::*;

use crate::{
    constants::{MAX_TRUSTED_REMOTE_LEN, PLACEHOLDER_NATIVE_FEE},
    errors::HubError,
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BridgeMode {
    /// Burn on send, mint on receive. No custodial balance exists.
    #[default]
    BurnMint,
    /// Lock into custody on send, release from custody on receive.
    LockUnlock,
}

/// Seeds: ["bridge_config"]
#[account]
#[derive(Default)]
pub struct BridgeConfig {
    pub admin: Pubkey,
    /// Home ledger (Neurons SPL mint).
    pub mint: Pubkey,
    /// Token account owned by this PDA; backing balance under LockUnlock.
    pub custody: Pubkey,
    /// Messaging endpoint allowed to deliver inbound transfers. Default = unset.
    pub endpoint: Pubkey,
    pub mode: BridgeMode,
    pub paused: bool,
    pub total_sent: u64,
    pub total_received: u64,
    /// Number of remote chains currently allowed.
    pub active_chain_count: u32,
    /// Monotonic nonce assigned to outbound messages.
    pub outbound_nonce: u64,
    pub bump: u8,
}

impl BridgeConfig {
    pub const LEN: usize = 8 + 32 + 32 + 32 + 32 + 1 + 1 + 8 + 8 + 4 + 8 + 1;

    pub fn check_send(&self, chain: &RemoteChain, recipient: &[u8; 32], amount: u64) -> Result<()> {
        require!(!self.paused, HubError::Paused);
        require!(chain.allowed, HubError::ChainNotAllowed);
        require!(*recipient != [0u8; 32], HubError::ZeroAddress);
        require!(amount > 0, HubError::ZeroAmount);
        require_keys_neq!(self.endpoint, Pubkey::default(), HubError::EndpointUnset);
        Ok(())
    }

    pub fn check_receive(&self, caller: &Pubkey, chain: &RemoteChain, recipient: &Pubkey, amount: u64) -> Result<()> {
        require_keys_neq!(self.endpoint, Pubkey::default(), HubError::EndpointUnset);
        require_keys_eq!(*caller, self.endpoint, HubError::UnauthorizedEndpoint);
        require!(!self.paused, HubError::Paused);
        require!(chain.allowed, HubError::ChainNotAllowed);
        require_keys_neq!(*recipient, Pubkey::default(), HubError::ZeroAddress);
        require!(amount > 0, HubError::ZeroAmount);
        Ok(())
    }

    /// Records an outbound transfer and returns the nonce assigned to it.
    pub fn record_sent(&mut self, chain: &mut RemoteChain, amount: u64) -> Result<u64> {
        let chain_sent = chain.sent.checked_add(amount).ok_or(HubError::MathOverflow)?;
        let total_sent = self.total_sent.checked_add(amount).ok_or(HubError::MathOverflow)?;
        let nonce = self.outbound_nonce.checked_add(1).ok_or(HubError::MathOverflow)?;

        chain.sent = chain_sent;
        self.total_sent = total_sent;
        self.outbound_nonce = nonce;
        Ok(nonce)
    }

    pub fn record_received(&mut self, chain: &mut RemoteChain, amount: u64) -> Result<()> {
        let chain_received = chain.received.checked_add(amount).ok_or(HubError::MathOverflow)?;
        let total_received = self.total_received.checked_add(amount).ok_or(HubError::MathOverflow)?;

        chain.received = chain_received;
        self.total_received = total_received;
        Ok(())
    }

    /// Toggles a chain's permission. Returns whether the state changed.
    pub fn set_chain_allowed(&mut self, chain: &mut RemoteChain, allowed: bool) -> Result<bool> {
        if chain.allowed == allowed {
            return Ok(false);
        }
        self.active_chain_count = if allowed {
            self.active_chain_count.checked_add(1)
        } else {
            self.active_chain_count.checked_sub(1)
        }
        .ok_or(HubError::MathOverflow)?;
        chain.allowed = allowed;
        Ok(true)
    }

    /// Custody balance must cover an unlock.
    pub fn check_custody(&self, custody_balance: u64, amount: u64) -> Result<()> {
        require!(custody_balance >= amount, HubError::InsufficientCustody);
        Ok(())
    }

    /// Amount an emergency withdrawal moves out of custody, or `None` under
    /// BurnMint where there is nothing to withdraw.
    pub fn emergency_withdrawal(&self, custody_balance: u64, amount: u64) -> Result<Option<u64>> {
        match self.mode {
            BridgeMode::BurnMint => Ok(None),
            BridgeMode::LockUnlock => {
                require!(amount > 0, HubError::ZeroAmount);
                self.check_custody(custody_balance, amount)?;
                Ok(Some(amount))
            }
        }
    }

    pub fn stats(&self) -> BridgeStats {
        BridgeStats {
            active_chain_count: self.active_chain_count,
            total_sent: self.total_sent,
            total_received: self.total_received,
        }
    }

    /// Fixed quote until a fee oracle exists. Inputs are accepted for
    /// interface stability and ignored.
    pub fn estimate_send_fee(
        _dst_chain_id: u32,
        _recipient: &[u8; 32],
        _amount: u64,
        _use_alt_fee_token: bool,
        _params: &[u8],
    ) -> SendFee {
        SendFee { native_fee: PLACEHOLDER_NATIVE_FEE, alt_token_fee: 0 }
    }
}

/// Seeds: ["remote_chain", chain_id (LE)]
#[account]
#[derive(Default)]
pub struct RemoteChain {
    pub chain_id: u32,
    pub allowed: bool,
    /// Encoded address of the peer adapter on the remote chain.
    pub trusted_remote: Vec<u8>,
    pub sent: u64,
    pub received: u64,
    pub bump: u8,
}

impl RemoteChain {
    pub const LEN: usize = 8 + 4 + 1 + (4 + MAX_TRUSTED_REMOTE_LEN) + 8 + 8 + 1;

    pub fn unconfigured(chain_id: u32) -> Self {
        Self { chain_id, ..Self::default() }
    }

    pub fn set_trusted_remote(&mut self, encoding: Vec<u8>) -> Result<()> {
        require!(encoding.len() <= MAX_TRUSTED_REMOTE_LEN, HubError::TrustedRemoteTooLong);
        self.trusted_remote = encoding;
        Ok(())
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats { sent: self.sent, received: self.received }
    }
}

/// Inbound message marker. Seeds: ["received_message", message_id]
#[account]
#[derive(Default)]
pub struct ReceivedMessage {
    pub message_id: [u8; 32],
    pub src_chain_id: u32,
    pub recipient: Pubkey,
    pub amount: u64,
    pub received_at: i64,
}

impl ReceivedMessage {
    pub const LEN: usize = 8 + 32 + 4 + 32 + 8 + 8;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub active_chain_count: u32,
    pub total_sent: u64,
    pub total_received: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainStats {
    pub sent: u64,
    pub received: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SendFee {
    pub native_fee: u64,
    pub alt_token_fee: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of<T: std::fmt::Debug>(result: Result<T>) -> u32 {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected program error, got {:?}", other),
        }
    }

    fn live_bridge() -> BridgeConfig {
        BridgeConfig { endpoint: Pubkey::new_unique(), ..BridgeConfig::default() }
    }

    fn allowed_chain(bridge: &mut BridgeConfig, chain_id: u32) -> RemoteChain {
        let mut chain = RemoteChain::unconfigured(chain_id);
        bridge.set_chain_allowed(&mut chain, true).unwrap();
        chain
    }

    #[test]
    fn send_check_order() {
        let mut bridge = BridgeConfig { paused: true, ..BridgeConfig::default() };
        let closed = RemoteChain::unconfigured(101);

        assert_eq!(code_of(bridge.check_send(&closed, &[0u8; 32], 0)), u32::from(HubError::Paused));
        bridge.paused = false;
        assert_eq!(code_of(bridge.check_send(&closed, &[0u8; 32], 0)), u32::from(HubError::ChainNotAllowed));

        let open = allowed_chain(&mut bridge, 101);
        assert_eq!(code_of(bridge.check_send(&open, &[0u8; 32], 0)), u32::from(HubError::ZeroAddress));
        assert_eq!(code_of(bridge.check_send(&open, &[1u8; 32], 0)), u32::from(HubError::ZeroAmount));
        assert_eq!(code_of(bridge.check_send(&open, &[1u8; 32], 5)), u32::from(HubError::EndpointUnset));

        bridge.endpoint = Pubkey::new_unique();
        bridge.check_send(&open, &[1u8; 32], 5).unwrap();
    }

    #[test]
    fn receive_requires_endpoint_caller() {
        let mut bridge = live_bridge();
        let chain = allowed_chain(&mut bridge, 7);
        let recipient = Pubkey::new_unique();

        assert_eq!(
            code_of(bridge.check_receive(&Pubkey::new_unique(), &chain, &recipient, 1)),
            u32::from(HubError::UnauthorizedEndpoint)
        );
        bridge.check_receive(&bridge.endpoint, &chain, &recipient, 1).unwrap();

        let closed = RemoteChain::unconfigured(8);
        assert_eq!(
            code_of(bridge.check_receive(&bridge.endpoint, &closed, &recipient, 1)),
            u32::from(HubError::ChainNotAllowed)
        );

        let unset = BridgeConfig::default();
        assert_eq!(
            code_of(unset.check_receive(&Pubkey::default(), &chain, &recipient, 1)),
            u32::from(HubError::EndpointUnset)
        );
    }

    #[test]
    fn active_chain_count_tracks_transitions() {
        let mut bridge = live_bridge();
        let mut a = RemoteChain::unconfigured(1);
        let mut b = RemoteChain::unconfigured(2);

        assert!(bridge.set_chain_allowed(&mut a, true).unwrap());
        assert!(!bridge.set_chain_allowed(&mut a, true).unwrap());
        assert!(bridge.set_chain_allowed(&mut b, true).unwrap());
        assert_eq!(bridge.stats().active_chain_count, 2);

        assert!(bridge.set_chain_allowed(&mut a, false).unwrap());
        assert!(!bridge.set_chain_allowed(&mut a, false).unwrap());
        assert_eq!(bridge.stats().active_chain_count, 1);

        // Never-allowed chains cannot drive the count negative.
        let mut c = RemoteChain::unconfigured(3);
        assert!(!bridge.set_chain_allowed(&mut c, false).unwrap());
        assert_eq!(bridge.stats().active_chain_count, 1);
    }

    #[test]
    fn per_chain_counters_sum_to_globals() {
        let mut bridge = live_bridge();
        let mut chains: Vec<RemoteChain> = (1..=3).map(|id| allowed_chain(&mut bridge, id)).collect();

        let ops: [(usize, bool, u64); 8] = [
            (0, true, 100),
            (1, true, 50),
            (0, false, 30),
            (2, true, 7),
            (1, false, 50),
            (2, false, 1),
            (0, true, 900),
            (2, true, 3),
        ];
        for (i, (idx, outbound, amount)) in ops.into_iter().enumerate() {
            if outbound {
                let nonce = bridge.record_sent(&mut chains[idx], amount).unwrap();
                assert!(nonce as usize > 0 && nonce as usize <= i + 1);
            } else {
                bridge.record_received(&mut chains[idx], amount).unwrap();
            }
            let sent: u64 = chains.iter().map(|c| c.stats().sent).sum();
            let received: u64 = chains.iter().map(|c| c.stats().received).sum();
            assert_eq!(sent, bridge.stats().total_sent);
            assert_eq!(received, bridge.stats().total_received);
        }

        assert_eq!(bridge.stats().total_sent, 1_060);
        assert_eq!(bridge.stats().total_received, 81);
        assert_eq!(bridge.outbound_nonce, 5);
    }

    #[test]
    fn overflow_leaves_counters_consistent() {
        let mut bridge = live_bridge();
        let mut chain = allowed_chain(&mut bridge, 1);
        bridge.record_sent(&mut chain, u64::MAX).unwrap();

        let mut other = allowed_chain(&mut bridge, 2);
        assert_eq!(code_of(bridge.record_sent(&mut other, 1)), u32::from(HubError::MathOverflow));
        assert_eq!(other.stats().sent, 0);
        assert_eq!(bridge.stats().total_sent, u64::MAX);
        assert_eq!(bridge.outbound_nonce, 1);
    }

    #[test]
    fn emergency_withdrawal_by_mode() {
        let burn_mint = BridgeConfig::default();
        assert_eq!(burn_mint.emergency_withdrawal(0, 1_000).unwrap(), None);
        assert_eq!(burn_mint.emergency_withdrawal(5_000, 1_000).unwrap(), None);

        let lock_unlock = BridgeConfig { mode: BridgeMode::LockUnlock, ..BridgeConfig::default() };
        assert_eq!(lock_unlock.emergency_withdrawal(5_000, 1_000).unwrap(), Some(1_000));
        assert_eq!(lock_unlock.emergency_withdrawal(1_000, 1_000).unwrap(), Some(1_000));
        assert_eq!(
            code_of(lock_unlock.emergency_withdrawal(999, 1_000)),
            u32::from(HubError::InsufficientCustody)
        );
    }

    #[test]
    fn trusted_remote_length_bounded() {
        let mut chain = RemoteChain::unconfigured(10);
        chain.set_trusted_remote(vec![0xab; MAX_TRUSTED_REMOTE_LEN]).unwrap();
        assert_eq!(
            code_of(chain.set_trusted_remote(vec![0xab; MAX_TRUSTED_REMOTE_LEN + 1])),
            u32::from(HubError::TrustedRemoteTooLong)
        );
        assert_eq!(chain.trusted_remote.len(), MAX_TRUSTED_REMOTE_LEN);
    }

    #[test]
    fn fee_quote_is_fixed() {
        let quote = BridgeConfig::estimate_send_fee(9, &[1u8; 32], 1_000, true, &[1, 2, 3]);
        assert_eq!(quote, SendFee { native_fee: PLACEHOLDER_NATIVE_FEE, alt_token_fee: 0 });
    }
}
