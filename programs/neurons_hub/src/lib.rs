//! # Neurons Hub Program
//!
//! Home-chain trust core of the Neurons reward token.
//!
//! - **Verifier**: EIP-712 attestations from a single trusted secp256k1 signer,
//!   bound to this deployment's domain.
//! - **Minter**: turns verified attestations into issuance to the DAO treasury,
//!   behind a permanent nonce registry and per-account rate limits.
//! - **Bridge**: moves the token to and from remote chains in BurnMint or
//!   LockUnlock mode, with per-chain permissions and counters.
//!
//! The SPL mint authority is the `LedgerAuthority` PDA. Components may only
//! issue or burn through it while they hold the matching role in the access map.

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

pub use constants::*;
pub use errors::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("NrnHub1111111111111111111111111111111111111");

#[program]
pub mod neurons_hub {
    use super::*;

    // Ledger access map

    /// Binds the hub to a mint whose authority was already set to the ledger PDA.
    pub fn initialize_ledger(ctx: Context<InitializeLedger>) -> Result<()> {
        instructions::initialize_ledger(ctx)
    }

    pub fn set_role(ctx: Context<SetRole>, account: Pubkey, role: Role, granted: bool) -> Result<()> {
        instructions::set_role(ctx, account, role, granted)
    }

    // Verifier

    pub fn initialize_verifier(ctx: Context<InitializeVerifier>, trusted_signer: [u8; 20], chain_id: u64) -> Result<()> {
        instructions::initialize_verifier(ctx, trusted_signer, chain_id)
    }

    pub fn set_trusted_signer(ctx: Context<SetTrustedSigner>, new_signer: [u8; 20]) -> Result<()> {
        instructions::set_trusted_signer(ctx, new_signer)
    }

    /// Read-only. Does not consume the nonce.
    pub fn verify(
        ctx: Context<VerifierView>,
        recipient: Pubkey,
        amount: u64,
        proof: AttestationProof,
        nonce: [u8; 32],
    ) -> Result<bool> {
        instructions::verify(ctx, recipient, amount, proof, nonce)
    }

    pub fn domain_separator(ctx: Context<VerifierView>) -> Result<[u8; 32]> {
        instructions::domain_separator(ctx)
    }

    pub fn build_message_hash(
        ctx: Context<VerifierView>,
        recipient: Pubkey,
        amount: u64,
        nonce: [u8; 32],
        expiry: u64,
    ) -> Result<[u8; 32]> {
        instructions::build_message_hash(ctx, recipient, amount, nonce, expiry)
    }

    // Minter

    pub fn initialize_minter(ctx: Context<InitializeMinter>, limits: MintLimits) -> Result<()> {
        instructions::initialize_minter(ctx, limits)
    }

    /// Mints `amount` to the treasury on behalf of `recipient`.
    pub fn mint_with_proof(
        ctx: Context<MintWithProof>,
        recipient: Pubkey,
        amount: u64,
        proof: AttestationProof,
        nonce: [u8; 32],
    ) -> Result<()> {
        instructions::mint_with_proof(ctx, recipient, amount, proof, nonce)
    }

    /// Rejected items are skipped; only a length mismatch fails the call.
    pub fn batch_mint_with_proofs<'info>(
        ctx: Context<'_, '_, '_, 'info, BatchMintWithProofs<'info>>,
        recipients: Vec<Pubkey>,
        amounts: Vec<u64>,
        proofs: Vec<AttestationProof>,
        nonces: Vec<[u8; 32]>,
    ) -> Result<()> {
        instructions::batch_mint_with_proofs(ctx, recipients, amounts, proofs, nonces)
    }

    pub fn set_limits(ctx: Context<MinterAdmin>, limits: MintLimits) -> Result<()> {
        instructions::set_limits(ctx, limits)
    }

    pub fn set_dao_treasury(ctx: Context<SetDaoTreasury>, new_treasury: Pubkey) -> Result<()> {
        instructions::set_dao_treasury(ctx, new_treasury)
    }

    pub fn pause_minter(ctx: Context<MinterAdmin>) -> Result<()> {
        instructions::set_minter_paused(ctx, true)
    }

    pub fn unpause_minter(ctx: Context<MinterAdmin>) -> Result<()> {
        instructions::set_minter_paused(ctx, false)
    }

    pub fn can_mint(ctx: Context<RateView>, account: Pubkey, amount: u64) -> Result<bool> {
        instructions::can_mint(ctx, account, amount)
    }

    pub fn get_remaining_daily_limit(ctx: Context<RateView>, account: Pubkey) -> Result<u64> {
        instructions::get_remaining_daily_limit(ctx, account)
    }

    pub fn get_next_mint_time(ctx: Context<RateView>, account: Pubkey) -> Result<i64> {
        instructions::get_next_mint_time(ctx, account)
    }

    pub fn get_minting_stats(ctx: Context<MinterView>) -> Result<MintingStats> {
        instructions::get_minting_stats(ctx)
    }

    pub fn nonce_used(ctx: Context<NonceView>, nonce: [u8; 32]) -> Result<bool> {
        instructions::nonce_used(ctx, nonce)
    }

    // Bridge

    pub fn initialize_bridge(ctx: Context<InitializeBridge>, mode: BridgeMode) -> Result<()> {
        instructions::initialize_bridge(ctx, mode)
    }

    pub fn set_endpoint(ctx: Context<BridgeAdmin>, endpoint: Pubkey) -> Result<()> {
        instructions::set_endpoint(ctx, endpoint)
    }

    pub fn allow_remote(ctx: Context<ConfigureRemote>, chain_id: u32, allowed: bool) -> Result<()> {
        instructions::allow_remote(ctx, chain_id, allowed)
    }

    pub fn set_trusted_remote(ctx: Context<ConfigureRemote>, chain_id: u32, trusted_remote: Vec<u8>) -> Result<()> {
        instructions::set_trusted_remote(ctx, chain_id, trusted_remote)
    }

    pub fn set_bridge_mode(ctx: Context<BridgeAdmin>, burn_mint: bool) -> Result<()> {
        instructions::set_bridge_mode(ctx, burn_mint)
    }

    pub fn pause_bridge(ctx: Context<BridgeAdmin>) -> Result<()> {
        instructions::set_bridge_paused(ctx, true)
    }

    pub fn unpause_bridge(ctx: Context<BridgeAdmin>) -> Result<()> {
        instructions::set_bridge_paused(ctx, false)
    }

    pub fn send_tokens(
        ctx: Context<SendTokens>,
        dst_chain_id: u32,
        recipient: [u8; 32],
        amount: u64,
        params: Vec<u8>,
    ) -> Result<()> {
        instructions::send_tokens(ctx, dst_chain_id, recipient, amount, params)
    }

    /// Endpoint-only. `message_id` is single-use.
    pub fn receive_tokens(
        ctx: Context<ReceiveTokens>,
        src_chain_id: u32,
        message_id: [u8; 32],
        recipient: Pubkey,
        amount: u64,
    ) -> Result<()> {
        instructions::receive_tokens(ctx, src_chain_id, message_id, recipient, amount)
    }

    pub fn estimate_send_fee(
        ctx: Context<BridgeView>,
        dst_chain_id: u32,
        recipient: [u8; 32],
        amount: u64,
        use_alt_fee_token: bool,
        params: Vec<u8>,
    ) -> Result<SendFee> {
        instructions::estimate_send_fee(ctx, dst_chain_id, recipient, amount, use_alt_fee_token, params)
    }

    /// No-op under BurnMint.
    pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
        instructions::emergency_withdraw(ctx, amount)
    }

    pub fn get_bridge_stats(ctx: Context<BridgeView>) -> Result<BridgeStats> {
        instructions::get_bridge_stats(ctx)
    }

    pub fn get_chain_stats(ctx: Context<ChainView>, chain_id: u32) -> Result<ChainStats> {
        instructions::get_chain_stats(ctx, chain_id)
    }

    pub fn is_chain_allowed(ctx: Context<ChainView>, chain_id: u32) -> Result<bool> {
        instructions::is_chain_allowed(ctx, chain_id)
    }

    pub fn get_trusted_remote(ctx: Context<ChainView>, chain_id: u32) -> Result<Vec<u8>> {
        instructions::get_trusted_remote(ctx, chain_id)
    }
}
