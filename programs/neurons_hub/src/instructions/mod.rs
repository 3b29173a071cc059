pub mod bridge;
pub mod ledger;
pub mod minter;
pub mod verifier;

pub use bridge::*;
pub use ledger::*;
pub use minter::*;
pub use verifier::*;
