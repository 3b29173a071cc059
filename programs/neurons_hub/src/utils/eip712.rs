//! EIP-712 typed-data hashing for mint attestations.
//!
//! The digest produced here must be bit-identical to what a standards
//! compliant `signTypedData` implementation computes for the same domain and
//! record, otherwise trusted-signer attestations will never verify.
//!
//! Solana accounts are 32 bytes, so the record types the recipient as
//! `bytes32`. The domain keeps the canonical `EIP712Domain` layout, with the
//! verifying contract derived from the program id (see [`verifying_contract`]).

use anchor_lang::{prelude::*, solana_program::keccak};

use crate::constants::EVM_ADDRESS_SIZE;

pub const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

pub const MINT_PROOF_TYPE: &[u8] = b"MintProof(bytes32 recipient,uint256 amount,bytes32 nonce,uint256 expiry)";

/// Left-pads an unsigned integer into a 32-byte ABI word.
pub fn u256_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Left-pads a 20-byte address into a 32-byte ABI word.
pub fn address_word(address: &[u8; EVM_ADDRESS_SIZE]) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address);
    word
}

/// 20-byte deployment identifier used as `verifyingContract`: the low 20 bytes
/// of `keccak256(program_id)`, mirroring how EVM addresses are derived.
pub fn verifying_contract(program_id: &Pubkey) -> [u8; EVM_ADDRESS_SIZE] {
    let digest = keccak::hash(program_id.as_ref()).to_bytes();
    let mut address = [0u8; EVM_ADDRESS_SIZE];
    address.copy_from_slice(&digest[32 - EVM_ADDRESS_SIZE..]);
    address
}

pub struct Eip712Domain<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub chain_id: u64,
    pub verifying_contract: [u8; EVM_ADDRESS_SIZE],
}

impl Eip712Domain<'_> {
    pub fn separator(&self) -> [u8; 32] {
        keccak::hashv(&[
            &keccak::hash(EIP712_DOMAIN_TYPE).to_bytes(),
            &keccak::hash(self.name.as_bytes()).to_bytes(),
            &keccak::hash(self.version.as_bytes()).to_bytes(),
            &u256_word(self.chain_id),
            &address_word(&self.verifying_contract),
        ])
        .to_bytes()
    }
}

/// Signed attestation record: `recipient` earned `amount`, redeemable once
/// under `nonce` until `expiry`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attestation {
    pub recipient: Pubkey,
    pub amount: u64,
    pub nonce: [u8; 32],
    pub expiry: u64,
}

impl Attestation {
    pub fn struct_hash(&self) -> [u8; 32] {
        keccak::hashv(&[
            &keccak::hash(MINT_PROOF_TYPE).to_bytes(),
            self.recipient.as_ref(),
            &u256_word(self.amount),
            &self.nonce,
            &u256_word(self.expiry),
        ])
        .to_bytes()
    }
}

/// `keccak256("\x19\x01" ‖ domainSeparator ‖ structHash)`
pub fn typed_data_hash(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[b"\x19\x01", domain_separator, struct_hash]).to_bytes()
}
