pub mod accounts;
pub mod eip712;
pub mod signer;

pub use accounts::*;
pub use eip712::*;
pub use signer::*;

#[cfg(test)]
pub(crate) use signer::test_signing;
