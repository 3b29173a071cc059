//! Program errors for the remote Neurons ledger.

use anchor_lang::prelude::*;

#[error_code]
pub enum ProxyError {
    #[msg("Address must not be the null address")]
    ZeroAddress,

    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Unauthorized: admin required")]
    UnauthorizedAdmin,

    #[msg("Unauthorized: caller is not the bridge")]
    Unauthorized,

    #[msg("Delegatee account does not match the holder's delegate")]
    DelegateMismatch,

    #[msg("Balance too low")]
    InsufficientBalance,

    #[msg("Checkpoint height precedes the latest checkpoint")]
    CheckpointOutOfOrder,

    #[msg("Checkpoint account has no room for another entry")]
    CheckpointCapacity,

    #[msg("Lookup height must be in the past")]
    FutureLookup,

    #[msg("Arithmetic overflow")]
    MathOverflow,
}
