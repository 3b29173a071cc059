use anchor_lang::prelude::*;
use anchor_spl::token::Mint;

use crate::{
    constants::{LEDGER_SEED, ROLE_SEED},
    errors::HubError,
    events::{LedgerInitialized, RoleUpdated},
    state::{LedgerAuthority, Role, RoleGrant},
    utils::load_optional,
};

#[derive(Accounts)]
pub struct InitializeLedger<'info> {
    #[account(
        init,
        payer = admin,
        space = LedgerAuthority::LEN,
        seeds = [LEDGER_SEED],
        bump
    )]
    pub ledger: Account<'info, LedgerAuthority>,

    /// Mint authority must already be handed to the ledger PDA.
    #[account(
        constraint = mint.mint_authority == Some(ledger.key()).into() @ HubError::InvalidMint
    )]
    pub mint: Account<'info, Mint>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_ledger(ctx: Context<InitializeLedger>) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    ledger.admin = ctx.accounts.admin.key();
    ledger.mint = ctx.accounts.mint.key();
    ledger.bump = ctx.bumps.ledger;

    emit!(LedgerInitialized {
        admin: ledger.admin,
        mint: ledger.mint,
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("Ledger initialized: mint {}", ledger.mint);

    Ok(())
}

#[derive(Accounts)]
#[instruction(account: Pubkey, role: Role)]
pub struct SetRole<'info> {
    #[account(
        seeds = [LEDGER_SEED],
        bump = ledger.bump,
        constraint = ledger.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub ledger: Account<'info, LedgerAuthority>,

    #[account(
        init_if_needed,
        payer = admin,
        space = RoleGrant::LEN,
        seeds = [ROLE_SEED, role.seed(), account.as_ref()],
        bump
    )]
    pub grant: Account<'info, RoleGrant>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn set_role(ctx: Context<SetRole>, account: Pubkey, role: Role, granted: bool) -> Result<()> {
    require_keys_neq!(account, Pubkey::default(), HubError::ZeroAddress);

    let grant = &mut ctx.accounts.grant;
    grant.account = account;
    grant.role = role;
    grant.granted = granted;
    grant.bump = ctx.bumps.grant;

    emit!(RoleUpdated {
        account,
        role,
        granted,
        admin: ctx.accounts.admin.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("Role {:?} for {} set to {}", role, account, granted);

    Ok(())
}

/// Fails `MissingRole` unless `grant` is the live (role, holder) entry of the
/// access map. `grant` may be an account that was never created.
pub fn require_role(grant: &AccountInfo, holder: &Pubkey, role: Role) -> Result<()> {
    require_keys_eq!(grant.key(), role.grant_address(holder, &crate::ID), HubError::MissingRole);
    let authorized = load_optional::<RoleGrant>(grant)?.map_or(false, |g| g.authorizes(holder, role));
    require!(authorized, HubError::MissingRole);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serialized(grant: &RoleGrant) -> Vec<u8> {
        let mut data = Vec::new();
        grant.try_serialize(&mut data).unwrap();
        data
    }

    fn check(key: Pubkey, owner: Pubkey, mut data: Vec<u8>, holder: &Pubkey, role: Role) -> Result<()> {
        let mut lamports = 1_000_000u64;
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        require_role(&info, holder, role)
    }

    fn assert_missing_role(result: Result<()>) {
        match result {
            Err(Error::AnchorError(e)) => assert_eq!(e.error_code_number, u32::from(HubError::MissingRole)),
            other => panic!("expected MissingRole, got {:?}", other),
        }
    }

    #[test]
    fn live_grant_passes() {
        let holder = Pubkey::new_unique();
        let address = Role::Minter.grant_address(&holder, &crate::ID);
        let grant = RoleGrant { account: holder, role: Role::Minter, granted: true, bump: 255 };

        check(address, crate::ID, serialized(&grant), &holder, Role::Minter).unwrap();
    }

    #[test]
    fn revoked_or_missing_grant_fails() {
        let holder = Pubkey::new_unique();
        let address = Role::Minter.grant_address(&holder, &crate::ID);
        let revoked = RoleGrant { account: holder, role: Role::Minter, granted: false, bump: 255 };

        assert_missing_role(check(address, crate::ID, serialized(&revoked), &holder, Role::Minter));
        assert_missing_role(check(address, System::id(), Vec::new(), &holder, Role::Minter));
    }

    #[test]
    fn grant_for_other_role_or_holder_fails() {
        let holder = Pubkey::new_unique();
        let burner_address = Role::Burner.grant_address(&holder, &crate::ID);
        let burner = RoleGrant { account: holder, role: Role::Burner, granted: true, bump: 255 };

        assert_missing_role(check(burner_address, crate::ID, serialized(&burner), &holder, Role::Minter));
        assert_missing_role(check(
            burner_address,
            crate::ID,
            serialized(&burner),
            &Pubkey::new_unique(),
            Role::Burner,
        ));
    }
}
