//! Proof-gated minting: admission control, nonce registry entries and
//! per-account rate limiting.

use anchor_lang::prelude::*;

use crate::{
    constants::ROLLING_WINDOW_SECONDS,
    errors::HubError,
    state::{AttestationProof, ProofVerifier},
};

/// Rate limits applied to every attested mint. Zero disables a limit.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintLimits {
    /// Minimum seconds between accepted mints for one recipient.
    pub cooldown_seconds: i64,
    /// Maximum total per recipient per rolling 24h window.
    pub daily_cap: u64,
    /// Maximum amount of a single mint.
    pub per_mint_cap: u64,
}

impl MintLimits {
    pub const LEN: usize = 8 + 8 + 8;
}

#[account]
#[derive(Default)]
pub struct MinterConfig {
    pub admin: Pubkey,
    /// Neurons SPL mint.
    pub mint: Pubkey,
    /// Token account credited by every attested mint.
    pub treasury: Pubkey,
    /// VerifierConfig consulted for every attestation.
    pub verifier: Pubkey,
    pub paused: bool,
    pub limits: MintLimits,
    /// Accepted mints across both entry points.
    pub total_mints_processed: u64,
    pub total_tokens_minted: u64,
    pub bump: u8,
}

impl MinterConfig {
    pub const LEN: usize = 8 + 32 + 32 + 32 + 32 + 1 + MintLimits::LEN + 8 + 8 + 1;

    /// Checks a request in admission order. Nothing is mutated; the caller
    /// records the mint only after this returns `Ok`.
    pub fn admit<V: ProofVerifier>(
        &self,
        verifier: &V,
        request: &MintRequest,
        nonce_consumed: bool,
        rate: &RateState,
        now: i64,
    ) -> Result<()> {
        require_keys_neq!(request.recipient, Pubkey::default(), HubError::ZeroAddress);
        require!(request.amount > 0, HubError::ZeroAmount);
        require!(!nonce_consumed, HubError::NonceReused);

        if !verifier.verify(request.recipient, request.amount, &request.proof, request.nonce, now)? {
            return err!(HubError::InvalidProof);
        }

        self.check_limits(rate, request.amount, now)
    }

    pub fn check_limits(&self, rate: &RateState, amount: u64, now: i64) -> Result<()> {
        require!(!rate.cooling_down(self.limits.cooldown_seconds, now), HubError::CooldownActive);

        let per_mint_cap = self.limits.per_mint_cap;
        require!(per_mint_cap == 0 || amount <= per_mint_cap, HubError::SingleMintCapExceeded);

        if self.limits.daily_cap > 0 {
            let projected = rate.window_total_at(now).checked_add(amount).ok_or(HubError::DailyCapExceeded)?;
            require!(projected <= self.limits.daily_cap, HubError::DailyCapExceeded);
        }

        Ok(())
    }

    /// Applies an admitted mint to the recipient's rate state and the
    /// aggregate counters.
    pub fn record_mint(&mut self, rate: &mut RateState, amount: u64, now: i64) -> Result<()> {
        let total_mints = self.total_mints_processed.checked_add(1).ok_or(HubError::MathOverflow)?;
        let total_minted = self.total_tokens_minted.checked_add(amount).ok_or(HubError::MathOverflow)?;
        rate.record(amount, now)?;

        self.total_mints_processed = total_mints;
        self.total_tokens_minted = total_minted;
        Ok(())
    }

    /// Pure predicate over caps and cooldown; ignores pause, proofs and nonces.
    pub fn can_mint(&self, rate: &RateState, amount: u64, now: i64) -> bool {
        amount > 0 && self.check_limits(rate, amount, now).is_ok()
    }

    pub fn remaining_daily_limit(&self, rate: &RateState, now: i64) -> u64 {
        if self.limits.daily_cap == 0 {
            return u64::MAX;
        }
        self.limits.daily_cap.saturating_sub(rate.window_total_at(now))
    }

    pub fn next_mint_time(&self, rate: &RateState) -> i64 {
        rate.last_mint_time.saturating_add(self.limits.cooldown_seconds)
    }

    pub fn stats(&self) -> MintingStats {
        let average_mint_size = self
            .total_tokens_minted
            .checked_div(self.total_mints_processed)
            .unwrap_or_default();
        MintingStats {
            total_mints: self.total_mints_processed,
            total_minted: self.total_tokens_minted,
            average_mint_size,
        }
    }
}

/// Per-recipient rate state. Mutated only by accepted mints.
#[account]
#[derive(Default)]
pub struct RateState {
    pub account: Pubkey,
    /// Timestamp of the last accepted mint; zero if none.
    pub last_mint_time: i64,
    pub window_start: i64,
    pub window_total: u64,
    pub bump: u8,
}

impl RateState {
    pub const LEN: usize = 8 + 32 + 8 + 8 + 8 + 1;

    fn window_expired(&self, now: i64) -> bool {
        now.saturating_sub(self.window_start) >= ROLLING_WINDOW_SECONDS
    }

    /// Window total as seen at `now`, after rolling an expired window.
    pub fn window_total_at(&self, now: i64) -> u64 {
        if self.window_expired(now) {
            0
        } else {
            self.window_total
        }
    }

    pub fn cooling_down(&self, cooldown_seconds: i64, now: i64) -> bool {
        cooldown_seconds > 0 && self.last_mint_time != 0 && now.saturating_sub(self.last_mint_time) < cooldown_seconds
    }

    fn record(&mut self, amount: u64, now: i64) -> Result<()> {
        let window_total = self.window_total_at(now).checked_add(amount).ok_or(HubError::MathOverflow)?;
        if self.window_expired(now) {
            self.window_start = now;
        }
        self.window_total = window_total;
        self.last_mint_time = now;
        Ok(())
    }
}

/// Nonce registry entry. Existence of the PDA marks the nonce consumed.
#[account]
#[derive(Default)]
pub struct UsedNonce {
    pub nonce: [u8; 32],
    pub recipient: Pubkey,
    pub amount: u64,
    pub consumed_at: i64,
}

impl UsedNonce {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 8;
}

/// One attested mint request as submitted by a caller.
#[derive(Clone, Copy, Debug)]
pub struct MintRequest {
    pub recipient: Pubkey,
    pub amount: u64,
    pub proof: AttestationProof,
    pub nonce: [u8; 32],
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintingStats {
    pub total_mints: u64,
    pub total_minted: u64,
    pub average_mint_size: u64,
}
