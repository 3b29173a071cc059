//! Seeds, domain parameters and protocol limits.

/// Ledger authority PDA; SPL mint authority of the Neurons mint.
pub const LEDGER_SEED: &[u8] = b"ledger";
/// Access map entry PDA: ["role", role, account].
pub const ROLE_SEED: &[u8] = b"role";
pub const VERIFIER_CONFIG_SEED: &[u8] = b"verifier_config";
pub const MINTER_CONFIG_SEED: &[u8] = b"minter_config";
/// Nonce registry entry PDA: ["used_nonce", nonce].
pub const USED_NONCE_SEED: &[u8] = b"used_nonce";
/// Per-account rate state PDA: ["rate_state", recipient].
pub const RATE_STATE_SEED: &[u8] = b"rate_state";
pub const BRIDGE_CONFIG_SEED: &[u8] = b"bridge_config";
/// Per-chain record PDA: ["remote_chain", chain_id (LE)].
pub const REMOTE_CHAIN_SEED: &[u8] = b"remote_chain";
/// Inbound message marker PDA: ["received_message", message_id].
pub const RECEIVED_MESSAGE_SEED: &[u8] = b"received_message";

/// EIP-712 domain name shared with off-chain attesters.
pub const DOMAIN_NAME: &str = "NeuronsPoK";
pub const DOMAIN_VERSION: &str = "1";

/// Length of the rolling daily mint window.
pub const ROLLING_WINDOW_SECONDS: i64 = 86_400;

/// Fixed native fee quoted by `estimate_send_fee` (0.001 SOL).
pub const PLACEHOLDER_NATIVE_FEE: u64 = 1_000_000;

pub const MAX_TRUSTED_REMOTE_LEN: usize = 64;
pub const MAX_ADAPTER_PARAMS_LEN: usize = 256;

pub const EVM_ADDRESS_SIZE: usize = 20;
pub const SIGNATURE_LENGTH: usize = 65;
