//! Events emitted by the Neurons hub program.
//! Indexers rebuild mint totals and bridge counters from these alone.

use anchor_lang::prelude::*;

use crate::state::{BridgeMode, MintLimits, Role};

#[event]
pub struct LedgerInitialized {
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct RoleUpdated {
    pub account: Pubkey,
    pub role: Role,
    pub granted: bool,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct TrustedSignerUpdated {
    pub old_signer: [u8; 20],
    pub new_signer: [u8; 20],
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct MintedWithProof {
    /// Attributed earner; the tokens go to `treasury`.
    pub recipient: Pubkey,
    pub treasury: Pubkey,
    pub amount: u64,
    pub nonce: [u8; 32],
    pub timestamp: i64,
}

#[event]
pub struct BatchMinted {
    pub requested: u64,
    pub accepted: u64,
    pub amount: u64,
    pub timestamp: i64,
}

#[event]
pub struct LimitsUpdated {
    pub limits: MintLimits,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct DaoTreasuryUpdated {
    pub old_treasury: Pubkey,
    pub new_treasury: Pubkey,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct MinterPauseChanged {
    pub paused: bool,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct EndpointUpdated {
    pub old_endpoint: Pubkey,
    pub new_endpoint: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct RemoteAllowed {
    pub chain_id: u32,
    pub allowed: bool,
    pub active_chain_count: u32,
    pub timestamp: i64,
}

#[event]
pub struct TrustedRemoteSet {
    pub chain_id: u32,
    pub trusted_remote: Vec<u8>,
    pub timestamp: i64,
}

#[event]
pub struct BridgeModeChanged {
    pub mode: BridgeMode,
    pub admin: Pubkey,
    pub timestamp: i64,
}

#[event]
pub struct BridgePauseChanged {
    pub paused: bool,
    pub admin: Pubkey,
    pub timestamp: i64,
}

/// Everything an off-chain relay needs to deliver the transfer.
#[event]
pub struct TokensSent {
    pub sender: Pubkey,
    pub dst_chain_id: u32,
    pub trusted_remote: Vec<u8>,
    /// Recipient on destination (opaque; 32 bytes).
    pub recipient: [u8; 32],
    pub amount: u64,
    pub nonce: u64,
    pub mode: BridgeMode,
    pub params: Vec<u8>,
    pub timestamp: i64,
}

#[event]
pub struct TokensReceived {
    pub src_chain_id: u32,
    pub message_id: [u8; 32],
    pub recipient: Pubkey,
    pub amount: u64,
    pub mode: BridgeMode,
    pub timestamp: i64,
}

#[event]
pub struct EmergencyWithdrawal {
    pub to: Pubkey,
    pub amount: u64,
    /// False under BurnMint, where the call is a no-op.
    pub executed: bool,
    pub admin: Pubkey,
    pub timestamp: i64,
}
