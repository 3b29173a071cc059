use anchor_lang::{
    prelude::*,
    solana_program::{keccak, secp256k1_recover::secp256k1_recover},
};
use libsecp256k1::Signature as EVMSignature;

use crate::{
    constants::{EVM_ADDRESS_SIZE, SIGNATURE_LENGTH},
    errors::HubError,
};

/// Recovers the EVM address that produced `signature` (r ‖ s ‖ v) over `digest`.
///
/// Accepts both `v ∈ {27, 28}` and raw recovery ids `{0, 1}`. High-s signatures
/// are rejected so a signature cannot be replayed in its malleated form.
pub fn recover_signer(digest: &[u8; 32], signature: &[u8; SIGNATURE_LENGTH]) -> Result<[u8; EVM_ADDRESS_SIZE]> {
    let recovery_id = match signature[SIGNATURE_LENGTH - 1] {
        v @ (27 | 28) => v - 27,
        v @ (0 | 1) => v,
        _ => return err!(HubError::InvalidSignature),
    };

    let rs = &signature[..SIGNATURE_LENGTH - 1];
    let parsed = EVMSignature::parse_standard_slice(rs).map_err(|_| HubError::InvalidSignature)?;
    if parsed.s.is_high() {
        return err!(HubError::InvalidSignature);
    }

    let public_key = secp256k1_recover(digest, recovery_id, rs).map_err(|_| HubError::InvalidSignature)?;

    Ok(evm_address(&public_key.to_bytes()))
}

/// Last 20 bytes of `keccak256(uncompressed_pubkey[1..])`.
pub fn evm_address(public_key: &[u8; 64]) -> [u8; EVM_ADDRESS_SIZE] {
    let digest = keccak::hash(public_key).to_bytes();
    let mut address = [0u8; EVM_ADDRESS_SIZE];
    address.copy_from_slice(&digest[32 - EVM_ADDRESS_SIZE..]);
    address
}
