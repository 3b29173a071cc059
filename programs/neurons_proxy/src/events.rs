//! Events emitted by the remote Neurons ledger. Vote trackers replay these.

use anchor_lang::prelude::*;

#[event]
pub struct ProxyInitialized {
    pub admin: Pubkey,
    pub bridge: Pubkey,
    pub decimals: u8,
    pub slot: u64,
}

#[event]
pub struct BridgeMinted {
    pub to: Pubkey,
    pub amount: u64,
    pub total_supply: u64,
    pub slot: u64,
}

#[event]
pub struct BridgeBurned {
    pub from: Pubkey,
    pub amount: u64,
    pub total_supply: u64,
    pub slot: u64,
}

#[event]
pub struct DelegateChanged {
    pub delegator: Pubkey,
    pub from_delegate: Pubkey,
    pub to_delegate: Pubkey,
    pub slot: u64,
}

#[event]
pub struct DelegateVotesChanged {
    pub delegate: Pubkey,
    pub previous_votes: u64,
    pub new_votes: u64,
    pub slot: u64,
}

#[event]
pub struct BridgeUpdated {
    pub old_bridge: Pubkey,
    pub new_bridge: Pubkey,
    pub admin: Pubkey,
    pub slot: u64,
}
