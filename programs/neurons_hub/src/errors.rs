//! Hub program errors, grouped by failure class.

use anchor_lang::prelude::*;

#[error_code]
pub enum HubError {
    // Validation
    #[msg("Address must not be the null address")]
    ZeroAddress,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Batch argument lengths do not match")]
    ArrayLengthMismatch,

    #[msg("Trusted remote encoding too long")]
    TrustedRemoteTooLong,

    #[msg("Adapter params too long")]
    AdapterParamsTooLong,

    #[msg("Token account does not belong to the Neurons mint")]
    InvalidMint,

    #[msg("Account is not the expected program address")]
    InvalidAccount,

    // Authorization
    #[msg("Unauthorized: admin required")]
    UnauthorizedAdmin,

    #[msg("Unauthorized: caller is not the messaging endpoint")]
    UnauthorizedEndpoint,

    #[msg("Component lacks the required ledger role")]
    MissingRole,

    #[msg("Recovered signer is not the trusted signer")]
    InvalidSigner,

    #[msg("Malformed or malleable signature")]
    InvalidSignature,

    #[msg("Proof rejected by verifier")]
    InvalidProof,

    // Replay
    #[msg("Nonce already consumed")]
    NonceReused,

    #[msg("Attestation has expired")]
    ExpiredProof,

    #[msg("Inbound message already delivered")]
    MessageReplayed,

    // Rate limits
    #[msg("Mint cooldown not elapsed")]
    CooldownActive,

    #[msg("Amount exceeds per-mint cap")]
    SingleMintCapExceeded,

    #[msg("Amount exceeds remaining daily cap")]
    DailyCapExceeded,

    // Configuration
    #[msg("Messaging endpoint not set")]
    EndpointUnset,

    #[msg("Remote chain not allowed")]
    ChainNotAllowed,

    // Operational
    #[msg("Component is paused")]
    Paused,

    #[msg("Custody balance too low")]
    InsufficientCustody,

    #[msg("Arithmetic overflow")]
    MathOverflow,
}
