use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, MintTo, Token, TokenAccount};

use crate::{
    constants::{LEDGER_SEED, MINTER_CONFIG_SEED, RATE_STATE_SEED, USED_NONCE_SEED, VERIFIER_CONFIG_SEED},
    errors::HubError,
    events::{BatchMinted, DaoTreasuryUpdated, LimitsUpdated, MintedWithProof, MinterPauseChanged},
    instructions::require_role,
    state::{
        AttestationProof, LedgerAuthority, MintLimits, MintRequest, MinterConfig, MintingStats, RateState, Role,
        UsedNonce, VerifierConfig,
    },
    utils::{create_pda_account, is_initialized, load_optional, store},
};

#[derive(Accounts)]
pub struct InitializeMinter<'info> {
    #[account(
        init,
        payer = admin,
        space = MinterConfig::LEN,
        seeds = [MINTER_CONFIG_SEED],
        bump
    )]
    pub minter_config: Account<'info, MinterConfig>,

    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Account<'info, LedgerAuthority>,

    #[account(seeds = [VERIFIER_CONFIG_SEED], bump = verifier_config.bump)]
    pub verifier_config: Account<'info, VerifierConfig>,

    #[account(constraint = treasury.mint == ledger.mint @ HubError::InvalidMint)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_minter(ctx: Context<InitializeMinter>, limits: MintLimits) -> Result<()> {
    let config = &mut ctx.accounts.minter_config;
    config.admin = ctx.accounts.admin.key();
    config.mint = ctx.accounts.ledger.mint;
    config.treasury = ctx.accounts.treasury.key();
    config.verifier = ctx.accounts.verifier_config.key();
    config.paused = false;
    config.limits = limits;
    config.bump = ctx.bumps.minter_config;

    emit!(LimitsUpdated { limits, admin: config.admin, timestamp: Clock::get()?.unix_timestamp });
    msg!("Minter initialized: treasury {} limits {:?}", config.treasury, limits);

    Ok(())
}

#[derive(Accounts)]
#[instruction(recipient: Pubkey, amount: u64, proof: AttestationProof, nonce: [u8; 32])]
pub struct MintWithProof<'info> {
    #[account(
        mut,
        seeds = [MINTER_CONFIG_SEED],
        bump = minter_config.bump,
        constraint = !minter_config.paused @ HubError::Paused
    )]
    pub minter_config: Account<'info, MinterConfig>,

    #[account(address = minter_config.verifier)]
    pub verifier_config: Account<'info, VerifierConfig>,

    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Account<'info, LedgerAuthority>,

    /// CHECK: access map entry (Minter, minter_config); validated by `require_role`.
    pub minter_role: UncheckedAccount<'info>,

    /// CHECK: nonce registry entry; created by this instruction if the nonce is fresh.
    #[account(mut, seeds = [USED_NONCE_SEED, nonce.as_ref()], bump)]
    pub used_nonce: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = payer,
        space = RateState::LEN,
        seeds = [RATE_STATE_SEED, recipient.as_ref()],
        bump
    )]
    pub rate_state: Account<'info, RateState>,

    #[account(mut, address = ledger.mint @ HubError::InvalidMint)]
    pub mint: Account<'info, Mint>,

    #[account(mut, address = minter_config.treasury @ HubError::InvalidAccount)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn mint_with_proof(
    ctx: Context<MintWithProof>,
    recipient: Pubkey,
    amount: u64,
    proof: AttestationProof,
    nonce: [u8; 32],
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    require_role(&ctx.accounts.minter_role, &ctx.accounts.minter_config.key(), Role::Minter)?;

    let request = MintRequest { recipient, amount, proof, nonce };
    let accounts = ctx.accounts;
    let nonce_consumed = is_initialized(&accounts.used_nonce);
    accounts
        .minter_config
        .admit(&*accounts.verifier_config, &request, nonce_consumed, &accounts.rate_state, now)?;

    // Consume the nonce.
    let nonce_bump = [ctx.bumps.used_nonce];
    let nonce_seeds: &[&[u8]] = &[USED_NONCE_SEED, nonce.as_ref(), &nonce_bump];
    let used_nonce = accounts.used_nonce.to_account_info();
    create_pda_account(
        &accounts.payer.to_account_info(),
        &used_nonce,
        &accounts.system_program.to_account_info(),
        UsedNonce::LEN,
        nonce_seeds,
    )?;
    store(&used_nonce, &UsedNonce { nonce, recipient, amount, consumed_at: now })?;

    let rate_state = &mut accounts.rate_state;
    if rate_state.account == Pubkey::default() {
        rate_state.account = recipient;
        rate_state.bump = ctx.bumps.rate_state;
    }
    accounts.minter_config.record_mint(rate_state, amount, now)?;

    let ledger_seeds: &[&[u8]] = &[LEDGER_SEED, &[accounts.ledger.bump]];
    token::mint_to(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            MintTo {
                mint: accounts.mint.to_account_info(),
                to: accounts.treasury.to_account_info(),
                authority: accounts.ledger.to_account_info(),
            },
            &[ledger_seeds],
        ),
        amount,
    )?;

    emit!(MintedWithProof { recipient, treasury: accounts.treasury.key(), amount, nonce, timestamp: now });
    msg!("Minted {} for {} nonce 0x{}", amount, recipient, hex::encode(nonce));

    Ok(())
}

#[derive(Accounts)]
pub struct BatchMintWithProofs<'info> {
    #[account(
        mut,
        seeds = [MINTER_CONFIG_SEED],
        bump = minter_config.bump,
        constraint = !minter_config.paused @ HubError::Paused
    )]
    pub minter_config: Account<'info, MinterConfig>,

    #[account(address = minter_config.verifier)]
    pub verifier_config: Account<'info, VerifierConfig>,

    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Account<'info, LedgerAuthority>,

    /// CHECK: access map entry (Minter, minter_config); validated by `require_role`.
    pub minter_role: UncheckedAccount<'info>,

    #[account(mut, address = ledger.mint @ HubError::InvalidMint)]
    pub mint: Account<'info, Mint>,

    #[account(mut, address = minter_config.treasury @ HubError::InvalidAccount)]
    pub treasury: Account<'info, TokenAccount>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    // remaining_accounts: one (used_nonce, rate_state) pair per item, in order.
}

pub fn batch_mint_with_proofs<'info>(
    ctx: Context<'_, '_, '_, 'info, BatchMintWithProofs<'info>>,
    recipients: Vec<Pubkey>,
    amounts: Vec<u64>,
    proofs: Vec<AttestationProof>,
    nonces: Vec<[u8; 32]>,
) -> Result<()> {
    let requested = check_batch_shape(
        recipients.len(),
        &[amounts.len(), proofs.len(), nonces.len()],
        ctx.remaining_accounts.len(),
    )?;
    require_role(&ctx.accounts.minter_role, &ctx.accounts.minter_config.key(), Role::Minter)?;

    let now = Clock::get()?.unix_timestamp;
    let payer = ctx.accounts.payer.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let treasury = ctx.accounts.treasury.key();

    let mut accepted: u64 = 0;
    let mut batch_total: u64 = 0;

    for (index, pair) in ctx.remaining_accounts.chunks_exact(2).enumerate() {
        let request = MintRequest {
            recipient: recipients[index],
            amount: amounts[index],
            proof: proofs[index],
            nonce: nonces[index],
        };
        let item = BatchItemAccounts {
            used_nonce: &pair[0],
            rate_state: &pair[1],
            payer: &payer,
            system_program: &system_program,
        };

        match admit_batch_item(
            &mut ctx.accounts.minter_config,
            &ctx.accounts.verifier_config,
            &item,
            &request,
            batch_total,
            now,
        ) {
            Ok(total) => {
                batch_total = total;
                accepted += 1;
                emit!(MintedWithProof {
                    recipient: request.recipient,
                    treasury,
                    amount: request.amount,
                    nonce: request.nonce,
                    timestamp: now,
                });
            }
            Err(e) => msg!("Batch item {} skipped: {}", index, e),
        }
    }

    if batch_total > 0 {
        let ledger_seeds: &[&[u8]] = &[LEDGER_SEED, &[ctx.accounts.ledger.bump]];
        token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                MintTo {
                    mint: ctx.accounts.mint.to_account_info(),
                    to: ctx.accounts.treasury.to_account_info(),
                    authority: ctx.accounts.ledger.to_account_info(),
                },
                &[ledger_seeds],
            ),
            batch_total,
        )?;
    }

    emit!(BatchMinted { requested, accepted, amount: batch_total, timestamp: now });
    msg!("Batch mint: {}/{} accepted, {} minted", accepted, requested, batch_total);

    Ok(())
}

/// Every argument vector must match `count`, with one (used_nonce, rate_state)
/// pair of remaining accounts per item. Returns `count` as the event counter.
fn check_batch_shape(count: usize, argument_lens: &[usize], remaining_accounts: usize) -> Result<u64> {
    let pairs = count.checked_mul(2).ok_or(HubError::ArrayLengthMismatch)?;
    require!(
        argument_lens.iter().all(|len| *len == count) && remaining_accounts == pairs,
        HubError::ArrayLengthMismatch
    );
    u64::try_from(count).map_err(|_| error!(HubError::MathOverflow))
}

struct BatchItemAccounts<'a, 'info> {
    used_nonce: &'a AccountInfo<'info>,
    rate_state: &'a AccountInfo<'info>,
    payer: &'a AccountInfo<'info>,
    system_program: &'a AccountInfo<'info>,
}

/// Admits and records one batch item. Every check runs before the first write
/// and the config is committed last, so a rejected item leaves no trace.
/// Returns the new running batch total.
fn admit_batch_item(
    config: &mut MinterConfig,
    verifier: &VerifierConfig,
    item: &BatchItemAccounts,
    request: &MintRequest,
    batch_total: u64,
    now: i64,
) -> Result<u64> {
    let (nonce_key, nonce_bump) =
        Pubkey::find_program_address(&[USED_NONCE_SEED, request.nonce.as_ref()], &crate::ID);
    let (rate_key, rate_bump) =
        Pubkey::find_program_address(&[RATE_STATE_SEED, request.recipient.as_ref()], &crate::ID);
    require_keys_eq!(item.used_nonce.key(), nonce_key, HubError::InvalidAccount);
    require_keys_eq!(item.rate_state.key(), rate_key, HubError::InvalidAccount);

    let rate_exists = is_initialized(item.rate_state);
    let mut rate = load_optional::<RateState>(item.rate_state)?
        .unwrap_or(RateState { account: request.recipient, bump: rate_bump, ..RateState::default() });

    config.admit(verifier, request, is_initialized(item.used_nonce), &rate, now)?;
    let new_total = batch_total.checked_add(request.amount).ok_or(HubError::MathOverflow)?;
    let mut staged = config.clone();
    staged.record_mint(&mut rate, request.amount, now)?;

    create_pda_account(
        item.payer,
        item.used_nonce,
        item.system_program,
        UsedNonce::LEN,
        &[USED_NONCE_SEED, request.nonce.as_ref(), &[nonce_bump]],
    )?;
    store(
        item.used_nonce,
        &UsedNonce { nonce: request.nonce, recipient: request.recipient, amount: request.amount, consumed_at: now },
    )?;

    if !rate_exists {
        create_pda_account(
            item.payer,
            item.rate_state,
            item.system_program,
            RateState::LEN,
            &[RATE_STATE_SEED, request.recipient.as_ref(), &[rate_bump]],
        )?;
    }
    store(item.rate_state, &rate)?;
    *config = staged;

    Ok(new_total)
}

#[derive(Accounts)]
pub struct MinterAdmin<'info> {
    #[account(
        mut,
        seeds = [MINTER_CONFIG_SEED],
        bump = minter_config.bump,
        constraint = minter_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub minter_config: Account<'info, MinterConfig>,

    pub admin: Signer<'info>,
}

pub fn set_limits(ctx: Context<MinterAdmin>, limits: MintLimits) -> Result<()> {
    ctx.accounts.minter_config.limits = limits;

    emit!(LimitsUpdated { limits, admin: ctx.accounts.admin.key(), timestamp: Clock::get()?.unix_timestamp });
    msg!("Mint limits updated: {:?}", limits);

    Ok(())
}

pub fn set_minter_paused(ctx: Context<MinterAdmin>, paused: bool) -> Result<()> {
    ctx.accounts.minter_config.paused = paused;

    emit!(MinterPauseChanged { paused, admin: ctx.accounts.admin.key(), timestamp: Clock::get()?.unix_timestamp });
    msg!("Minter paused: {}", paused);

    Ok(())
}

#[derive(Accounts)]
#[instruction(new_treasury: Pubkey)]
pub struct SetDaoTreasury<'info> {
    #[account(
        mut,
        seeds = [MINTER_CONFIG_SEED],
        bump = minter_config.bump,
        constraint = minter_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub minter_config: Account<'info, MinterConfig>,

    #[account(
        address = new_treasury @ HubError::InvalidAccount,
        constraint = treasury.mint == minter_config.mint @ HubError::InvalidMint
    )]
    pub treasury: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,
}

pub fn set_dao_treasury(ctx: Context<SetDaoTreasury>, new_treasury: Pubkey) -> Result<()> {
    require_keys_neq!(new_treasury, Pubkey::default(), HubError::ZeroAddress);

    let config = &mut ctx.accounts.minter_config;
    let old_treasury = config.treasury;
    config.treasury = new_treasury;

    emit!(DaoTreasuryUpdated {
        old_treasury,
        new_treasury,
        admin: ctx.accounts.admin.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("DAO treasury: {} -> {}", old_treasury, new_treasury);

    Ok(())
}

#[derive(Accounts)]
pub struct MinterView<'info> {
    #[account(seeds = [MINTER_CONFIG_SEED], bump = minter_config.bump)]
    pub minter_config: Account<'info, MinterConfig>,
}

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct RateView<'info> {
    #[account(seeds = [MINTER_CONFIG_SEED], bump = minter_config.bump)]
    pub minter_config: Account<'info, MinterConfig>,

    /// CHECK: rate state of `account`; may not exist yet.
    #[account(seeds = [RATE_STATE_SEED, account.as_ref()], bump)]
    pub rate_state: UncheckedAccount<'info>,
}

impl RateView<'_> {
    fn rate(&self) -> Result<RateState> {
        Ok(load_optional::<RateState>(&self.rate_state)?.unwrap_or_default())
    }
}

pub fn can_mint(ctx: Context<RateView>, _account: Pubkey, amount: u64) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.minter_config.can_mint(&ctx.accounts.rate()?, amount, now))
}

pub fn get_remaining_daily_limit(ctx: Context<RateView>, _account: Pubkey) -> Result<u64> {
    let now = Clock::get()?.unix_timestamp;
    Ok(ctx.accounts.minter_config.remaining_daily_limit(&ctx.accounts.rate()?, now))
}

pub fn get_next_mint_time(ctx: Context<RateView>, _account: Pubkey) -> Result<i64> {
    Ok(ctx.accounts.minter_config.next_mint_time(&ctx.accounts.rate()?))
}

pub fn get_minting_stats(ctx: Context<MinterView>) -> Result<MintingStats> {
    Ok(ctx.accounts.minter_config.stats())
}

#[derive(Accounts)]
#[instruction(nonce: [u8; 32])]
pub struct NonceView<'info> {
    /// CHECK: nonce registry entry; existence is the answer.
    #[account(seeds = [USED_NONCE_SEED, nonce.as_ref()], bump)]
    pub used_nonce: UncheckedAccount<'info>,
}

pub fn nonce_used(ctx: Context<NonceView>, _nonce: [u8; 32]) -> Result<bool> {
    Ok(is_initialized(&ctx.accounts.used_nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_fixtures::Attester;

    const NOW: i64 = 1_706_400_000;

    fn code_of<T: std::fmt::Debug>(result: Result<T>) -> u32 {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected program error, got {:?}", other),
        }
    }

    /// Owned backing storage for a hand-built `AccountInfo`.
    struct TestAccount {
        key: Pubkey,
        owner: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    impl TestAccount {
        fn absent(key: Pubkey) -> Self {
            Self { key, owner: System::id(), lamports: 0, data: Vec::new() }
        }

        fn program_owned<T: AccountSerialize>(key: Pubkey, value: &T) -> Self {
            let mut data = Vec::new();
            value.try_serialize(&mut data).unwrap();
            Self { key, owner: crate::ID, lamports: 1_000_000, data }
        }

        fn info(&mut self) -> AccountInfo<'_> {
            AccountInfo::new(&self.key, false, true, &mut self.lamports, &mut self.data, &self.owner, false, 0)
        }
    }

    fn nonce_address(nonce: &[u8; 32]) -> Pubkey {
        Pubkey::find_program_address(&[USED_NONCE_SEED, nonce.as_ref()], &crate::ID).0
    }

    fn rate_address(recipient: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[RATE_STATE_SEED, recipient.as_ref()], &crate::ID).0
    }

    fn signed_request(attester: &Attester, amount: u64, nonce: u8) -> MintRequest {
        let recipient = Pubkey::new_unique();
        MintRequest {
            recipient,
            amount,
            proof: attester.attest(recipient, amount, [nonce; 32], (NOW + 3_600) as u64),
            nonce: [nonce; 32],
        }
    }

    fn minter() -> MinterConfig {
        MinterConfig { treasury: Pubkey::new_unique(), ..MinterConfig::default() }
    }

    #[test]
    fn batch_shape_requires_one_account_pair_per_item() {
        assert_eq!(check_batch_shape(3, &[3, 3, 3], 6).unwrap(), 3);
        assert_eq!(check_batch_shape(0, &[0, 0, 0], 0).unwrap(), 0);

        let mismatch = u32::from(HubError::ArrayLengthMismatch);
        assert_eq!(code_of(check_batch_shape(3, &[3, 3, 3], 5)), mismatch);
        assert_eq!(code_of(check_batch_shape(3, &[3, 3, 3], 3)), mismatch);
        assert_eq!(code_of(check_batch_shape(3, &[3, 2, 3], 6)), mismatch);
        assert_eq!(code_of(check_batch_shape(usize::MAX, &[], 0)), mismatch);
    }

    #[test]
    fn item_with_foreign_accounts_is_rejected_untouched() {
        let attester = Attester::new(11);
        let request = signed_request(&attester, 500, 1);
        let mut config = minter();

        let mut payer = TestAccount::absent(Pubkey::new_unique());
        let mut system = TestAccount::absent(System::id());
        let mut stray_nonce = TestAccount::absent(Pubkey::new_unique());
        let mut rate = TestAccount::absent(rate_address(&request.recipient));
        let (payer, system) = (payer.info(), system.info());
        let item = BatchItemAccounts {
            used_nonce: &stray_nonce.info(),
            rate_state: &rate.info(),
            payer: &payer,
            system_program: &system,
        };

        assert_eq!(
            code_of(admit_batch_item(&mut config, &attester.config, &item, &request, 0, NOW)),
            u32::from(HubError::InvalidAccount)
        );
        assert_eq!(config.stats(), MintingStats::default());
    }

    #[test]
    fn item_with_foreign_rate_state_is_rejected() {
        let attester = Attester::new(11);
        let request = signed_request(&attester, 500, 2);
        let mut config = minter();

        let mut payer = TestAccount::absent(Pubkey::new_unique());
        let mut system = TestAccount::absent(System::id());
        let mut nonce = TestAccount::absent(nonce_address(&request.nonce));
        // Rate state of some other recipient.
        let mut rate = TestAccount::absent(rate_address(&Pubkey::new_unique()));
        let (payer, system) = (payer.info(), system.info());
        let item = BatchItemAccounts {
            used_nonce: &nonce.info(),
            rate_state: &rate.info(),
            payer: &payer,
            system_program: &system,
        };

        assert_eq!(
            code_of(admit_batch_item(&mut config, &attester.config, &item, &request, 0, NOW)),
            u32::from(HubError::InvalidAccount)
        );
        assert_eq!(config.total_mints_processed, 0);
    }

    #[test]
    fn consumed_nonce_is_rejected_without_counting() {
        let attester = Attester::new(12);
        let request = signed_request(&attester, 750, 3);
        let mut config = minter();

        let consumed = UsedNonce {
            nonce: request.nonce,
            recipient: request.recipient,
            amount: 750,
            consumed_at: NOW - 60,
        };
        let mut payer = TestAccount::absent(Pubkey::new_unique());
        let mut system = TestAccount::absent(System::id());
        let mut nonce = TestAccount::program_owned(nonce_address(&request.nonce), &consumed);
        let mut rate = TestAccount::absent(rate_address(&request.recipient));
        let (payer, system) = (payer.info(), system.info());
        let item = BatchItemAccounts {
            used_nonce: &nonce.info(),
            rate_state: &rate.info(),
            payer: &payer,
            system_program: &system,
        };

        assert_eq!(
            code_of(admit_batch_item(&mut config, &attester.config, &item, &request, 100, NOW)),
            u32::from(HubError::NonceReused)
        );
        assert_eq!(config.stats(), MintingStats::default());
    }

    #[test]
    fn cooling_down_recipient_is_rejected_from_stored_rate_state() {
        let attester = Attester::new(13);
        let request = signed_request(&attester, 10, 4);
        let mut config = minter();
        config.limits.cooldown_seconds = 3_600;

        let stored = RateState {
            account: request.recipient,
            last_mint_time: NOW - 60,
            window_start: NOW - 60,
            window_total: 10,
            bump: 255,
        };
        let mut payer = TestAccount::absent(Pubkey::new_unique());
        let mut system = TestAccount::absent(System::id());
        let mut nonce = TestAccount::absent(nonce_address(&request.nonce));
        let mut rate = TestAccount::program_owned(rate_address(&request.recipient), &stored);
        let (payer, system) = (payer.info(), system.info());
        let item = BatchItemAccounts {
            used_nonce: &nonce.info(),
            rate_state: &rate.info(),
            payer: &payer,
            system_program: &system,
        };

        assert_eq!(
            code_of(admit_batch_item(&mut config, &attester.config, &item, &request, 0, NOW)),
            u32::from(HubError::CooldownActive)
        );
        assert_eq!(config.total_tokens_minted, 0);
    }

    #[test]
    fn admitted_item_commits_nothing_when_its_accounts_cannot_be_written() {
        // Passes every check, then fails creating the nonce marker: the staged
        // counters must not reach the config.
        let attester = Attester::new(14);
        let request = signed_request(&attester, 900, 5);
        let mut config = minter();

        let mut payer = TestAccount::absent(Pubkey::new_unique());
        let mut system = TestAccount::absent(System::id());
        let mut nonce = TestAccount::absent(nonce_address(&request.nonce));
        let mut rate = TestAccount::absent(rate_address(&request.recipient));
        let (payer, system) = (payer.info(), system.info());
        let (nonce_info, rate_info) = (nonce.info(), rate.info());
        let item = BatchItemAccounts {
            used_nonce: &nonce_info,
            rate_state: &rate_info,
            payer: &payer,
            system_program: &system,
        };

        assert!(config.admit(&attester.config, &request, false, &RateState::default(), NOW).is_ok());
        assert!(admit_batch_item(&mut config, &attester.config, &item, &request, 0, NOW).is_err());
        assert_eq!(config.stats(), MintingStats::default());
        assert!(!is_initialized(&nonce_info));
    }
}
