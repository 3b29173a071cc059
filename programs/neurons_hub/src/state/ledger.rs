use anchor_lang::prelude::*;

use crate::constants::ROLE_SEED;

/// Mint authority of the Neurons SPL mint. Every issuance (attested mints and
/// bridge credits) is signed by this PDA.
#[account]
#[derive(Default)]
pub struct LedgerAuthority {
    /// May grant and revoke ledger roles.
    pub admin: Pubkey,
    /// The Neurons SPL mint.
    pub mint: Pubkey,
    pub bump: u8,
}

impl LedgerAuthority {
    pub const LEN: usize = 8 + 32 + 32 + 1;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Minter,
    Burner,
}

impl Role {
    pub fn seed(&self) -> &'static [u8] {
        match self {
            Role::Minter => b"minter",
            Role::Burner => b"burner",
        }
    }

    pub fn grant_address(&self, account: &Pubkey, program_id: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[ROLE_SEED, self.seed(), account.as_ref()], program_id).0
    }
}

/// Access map entry keyed by (role, account).
#[account]
#[derive(Default)]
pub struct RoleGrant {
    pub account: Pubkey,
    pub role: Role,
    /// Revoked grants stay on-chain with `granted = false`.
    pub granted: bool,
    pub bump: u8,
}

impl RoleGrant {
    pub const LEN: usize = 8 + 32 + 1 + 1 + 1;

    pub fn authorizes(&self, account: &Pubkey, role: Role) -> bool {
        self.granted && self.account == *account && self.role == role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_seeds_are_distinct() {
        assert_ne!(Role::Minter.seed(), Role::Burner.seed());

        let program_id = Pubkey::new_unique();
        let holder = Pubkey::new_unique();
        assert_ne!(
            Role::Minter.grant_address(&holder, &program_id),
            Role::Burner.grant_address(&holder, &program_id)
        );
    }

    #[test]
    fn grant_authorizes_only_its_key_and_role() {
        let holder = Pubkey::new_unique();
        let grant = RoleGrant { account: holder, role: Role::Minter, granted: true, bump: 255 };

        assert!(grant.authorizes(&holder, Role::Minter));
        assert!(!grant.authorizes(&holder, Role::Burner));
        assert!(!grant.authorizes(&Pubkey::new_unique(), Role::Minter));

        let revoked = RoleGrant { granted: false, ..grant };
        assert!(!revoked.authorizes(&holder, Role::Minter));
    }
}
