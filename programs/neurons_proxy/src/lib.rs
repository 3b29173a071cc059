//! # Neurons Proxy Program
//!
//! Remote-chain representation of the Neurons token. Supply changes only
//! through the configured bridge authority; every balance change moves
//! checkpointed voting power so governance can query any settled slot.
//!
//! ## Voting power
//! - Holders self-delegate on their first credit
//! - `delegate` moves the holder's whole balance to another account
//! - Past lookups require a slot strictly before the current one

pub mod errors;
pub mod events;
pub mod state;

use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};
use state::{CheckpointHistory, Checkpoints, Holder, ProxyConfig, TOKEN_NAME, TOKEN_SYMBOL};

use errors::*;
use events::*;

declare_id!("NrnPxy1111111111111111111111111111111111111");

pub const CONFIG_SEED: &[u8] = b"config";
pub const HOLDER_SEED: &[u8] = b"holder";
pub const VOTES_SEED: &[u8] = b"votes";
pub const SUPPLY_SEED: &[u8] = b"supply";

#[program]
pub mod neurons_proxy {
    use super::*;

    /// Creates the config and the total-supply history. The signer becomes admin.
    pub fn initialize(ctx: Context<Initialize>, bridge: Pubkey, decimals: u8) -> Result<()> {
        require_keys_neq!(bridge, Pubkey::default(), ProxyError::ZeroAddress);

        let config = &mut ctx.accounts.config;
        config.admin = ctx.accounts.admin.key();
        config.bridge = bridge;
        config.total_supply = 0;
        config.name = TOKEN_NAME.to_string();
        config.symbol = TOKEN_SYMBOL.to_string();
        config.decimals = decimals;
        config.bump = ctx.bumps.config;

        let supply = &mut ctx.accounts.supply_checkpoints;
        supply.owner = Pubkey::default();
        supply.bump = ctx.bumps.supply_checkpoints;
        supply.len = 0;

        emit!(ProxyInitialized { admin: config.admin, bridge, decimals, slot: Clock::get()?.slot });
        msg!("Proxy initialized: bridge {} decimals {}", bridge, decimals);
        Ok(())
    }

    /// Rotate the bridge authority. Admin only.
    pub fn set_bridge(ctx: Context<SetBridge>, new_bridge: Pubkey) -> Result<()> {
        require_keys_neq!(new_bridge, Pubkey::default(), ProxyError::ZeroAddress);

        let config = &mut ctx.accounts.config;
        let old_bridge = config.bridge;
        config.bridge = new_bridge;

        emit!(BridgeUpdated { old_bridge, new_bridge, admin: ctx.accounts.admin.key(), slot: Clock::get()?.slot });
        msg!("Bridge authority: {} -> {}", old_bridge, new_bridge);
        Ok(())
    }

    /// Credit `to` with bridged-in tokens. Bridge only.
    /// `delegatee` must be the holder's delegate (`to` itself on first credit).
    pub fn bridge_mint(ctx: Context<BridgeMint>, to: Pubkey, amount: u64) -> Result<()> {
        require_keys_neq!(to, Pubkey::default(), ProxyError::ZeroAddress);
        require!(amount > 0, ProxyError::ZeroAmount);

        let slot = Clock::get()?.slot;
        let accounts = ctx.accounts;

        let holder = &mut accounts.holder;
        if holder.is_new() {
            holder.owner = to;
            holder.delegate = to;
            holder.bump = ctx.bumps.holder;
            emit!(DelegateChanged { delegator: to, from_delegate: Pubkey::default(), to_delegate: to, slot });
        }
        require_keys_eq!(accounts.delegatee.key(), holder.delegate, ProxyError::DelegateMismatch);
        holder.credit(amount)?;

        let config = &mut accounts.config;
        config.total_supply = config.total_supply.checked_add(amount).ok_or(ProxyError::MathOverflow)?;

        reserve_checkpoint(&accounts.supply_checkpoints, &accounts.bridge, &accounts.system_program)?;
        write_checkpoint(&mut accounts.supply_checkpoints, |supply, data| supply.increase(data, amount, slot))?;

        reserve_checkpoint(&accounts.delegatee_votes, &accounts.bridge, &accounts.system_program)?;
        let votes = &mut accounts.delegatee_votes;
        if votes.owner == Pubkey::default() {
            votes.owner = accounts.delegatee.key();
            votes.bump = ctx.bumps.delegatee_votes;
        }
        let (previous_votes, new_votes) = write_checkpoint(votes, |votes, data| votes.increase(data, amount, slot))?;

        emit!(DelegateVotesChanged { delegate: votes.owner, previous_votes, new_votes, slot });
        emit!(BridgeMinted { to, amount, total_supply: config.total_supply, slot });
        msg!("Bridge mint: {} to {} (supply {})", amount, to, config.total_supply);
        Ok(())
    }

    /// Debit `from` for bridged-out tokens. Bridge only.
    pub fn bridge_burn(ctx: Context<BridgeBurn>, from: Pubkey, amount: u64) -> Result<()> {
        require!(amount > 0, ProxyError::ZeroAmount);

        let slot = Clock::get()?.slot;
        let accounts = ctx.accounts;

        accounts.holder.debit(amount)?;

        let config = &mut accounts.config;
        config.total_supply = config.total_supply.checked_sub(amount).ok_or(ProxyError::MathOverflow)?;

        reserve_checkpoint(&accounts.supply_checkpoints, &accounts.bridge, &accounts.system_program)?;
        write_checkpoint(&mut accounts.supply_checkpoints, |supply, data| supply.decrease(data, amount, slot))?;

        reserve_checkpoint(&accounts.delegatee_votes, &accounts.bridge, &accounts.system_program)?;
        let votes = &mut accounts.delegatee_votes;
        let (previous_votes, new_votes) = write_checkpoint(votes, |votes, data| votes.decrease(data, amount, slot))?;

        emit!(DelegateVotesChanged { delegate: votes.owner, previous_votes, new_votes, slot });
        emit!(BridgeBurned { from, amount, total_supply: config.total_supply, slot });
        msg!("Bridge burn: {} from {} (supply {})", amount, from, config.total_supply);
        Ok(())
    }

    /// Move the signer's voting power to `to`.
    pub fn delegate(ctx: Context<Delegate>, to: Pubkey) -> Result<()> {
        require_keys_neq!(to, Pubkey::default(), ProxyError::ZeroAddress);

        let slot = Clock::get()?.slot;
        let accounts = ctx.accounts;
        let delegator = accounts.delegator.key();
        let from_delegate = accounts.holder.delegate;

        emit!(DelegateChanged { delegator, from_delegate, to_delegate: to, slot });
        if from_delegate == to {
            msg!("Delegate unchanged for {}", delegator);
            return Ok(());
        }

        let balance = accounts.holder.balance;
        accounts.holder.delegate = to;

        reserve_checkpoint(&accounts.old_delegate_votes, &accounts.delegator, &accounts.system_program)?;
        let (previous_votes, new_votes) =
            write_checkpoint(&mut accounts.old_delegate_votes, |votes, data| votes.decrease(data, balance, slot))?;
        emit!(DelegateVotesChanged { delegate: from_delegate, previous_votes, new_votes, slot });

        reserve_checkpoint(&accounts.new_delegate_votes, &accounts.delegator, &accounts.system_program)?;
        let votes = &mut accounts.new_delegate_votes;
        if votes.owner == Pubkey::default() {
            votes.owner = to;
            votes.bump = ctx.bumps.new_delegate_votes;
        }
        let (previous_votes, new_votes) = write_checkpoint(votes, |votes, data| votes.increase(data, balance, slot))?;
        emit!(DelegateVotesChanged { delegate: to, previous_votes, new_votes, slot });

        msg!("Delegate: {} moved {} votes {} -> {}", delegator, balance, from_delegate, to);
        Ok(())
    }

    pub fn get_votes(ctx: Context<VotesView>, _account: Pubkey) -> Result<u64> {
        let info = ctx.accounts.votes.to_account_info();
        let data = info.try_borrow_data()?;
        let votes = match load_optional::<Checkpoints>(&info)? {
            Some(votes) => votes.history(&data)?.latest(),
            None => 0,
        };
        Ok(votes)
    }

    pub fn get_past_votes(ctx: Context<VotesView>, _account: Pubkey, slot: u64) -> Result<u64> {
        let current_slot = Clock::get()?.slot;
        let info = ctx.accounts.votes.to_account_info();
        let data = info.try_borrow_data()?;
        let votes = match load_optional::<Checkpoints>(&info)? {
            Some(votes) => votes.history(&data)?.past_value(slot, current_slot)?,
            None => CheckpointHistory::EMPTY.past_value(slot, current_slot)?,
        };
        Ok(votes)
    }

    pub fn get_past_total_supply(ctx: Context<SupplyView>, slot: u64) -> Result<u64> {
        let current_slot = Clock::get()?.slot;
        let info = ctx.accounts.supply_checkpoints.to_account_info();
        let data = info.try_borrow_data()?;
        let supply = ctx.accounts.supply_checkpoints.history(&data)?.past_value(slot, current_slot)?;
        Ok(supply)
    }

    pub fn total_supply(ctx: Context<SupplyView>) -> Result<u64> {
        Ok(ctx.accounts.config.total_supply)
    }

    pub fn balance_of(ctx: Context<HolderView>, _owner: Pubkey) -> Result<u64> {
        Ok(load_optional::<Holder>(&ctx.accounts.holder)?.map_or(0, |h| h.balance))
    }

    /// Default key for accounts that never held tokens.
    pub fn delegates(ctx: Context<HolderView>, _owner: Pubkey) -> Result<Pubkey> {
        Ok(load_optional::<Holder>(&ctx.accounts.holder)?.map_or(Pubkey::default(), |h| h.delegate))
    }
}

/// Grows a checkpoint account by one entry, topping up rent from `payer`.
fn reserve_checkpoint<'info>(
    checkpoints: &Account<'info, Checkpoints>,
    payer: &Signer<'info>,
    system_program: &Program<'info, System>,
) -> Result<()> {
    let info = checkpoints.to_account_info();
    let space = Checkpoints::space_for(checkpoints.len as usize + 1);
    if info.data_len() >= space {
        return Ok(());
    }

    let top_up = Rent::get()?.minimum_balance(space).saturating_sub(info.lamports());
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.to_account_info(),
                Transfer { from: payer.to_account_info(), to: info.clone() },
            ),
            top_up,
        )?;
    }
    info.realloc(space, false)?;
    Ok(())
}

/// Runs `update` against the header and the raw entry bytes of `checkpoints`.
/// The header is written back by Anchor on exit.
fn write_checkpoint<T>(
    checkpoints: &mut Account<'_, Checkpoints>,
    update: impl FnOnce(&mut Checkpoints, &mut [u8]) -> Result<T>,
) -> Result<T> {
    let info = checkpoints.to_account_info();
    let mut data = info.try_borrow_mut_data()?;
    update(&mut **checkpoints, &mut data[..])
}

fn load_optional<T: AccountDeserialize>(info: &AccountInfo) -> Result<Option<T>> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return Ok(None);
    }
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map(Some)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = admin,
        space = ProxyConfig::LEN,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub config: Account<'info, ProxyConfig>,

    #[account(
        init,
        payer = admin,
        space = Checkpoints::space_for(0),
        seeds = [SUPPLY_SEED],
        bump
    )]
    pub supply_checkpoints: Account<'info, Checkpoints>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SetBridge<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        constraint = config.admin == admin.key() @ ProxyError::UnauthorizedAdmin
    )]
    pub config: Account<'info, ProxyConfig>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
#[instruction(to: Pubkey)]
pub struct BridgeMint<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        constraint = config.bridge == bridge.key() @ ProxyError::Unauthorized
    )]
    pub config: Account<'info, ProxyConfig>,

    #[account(
        init_if_needed,
        payer = bridge,
        space = Holder::LEN,
        seeds = [HOLDER_SEED, to.as_ref()],
        bump
    )]
    pub holder: Account<'info, Holder>,

    /// CHECK: only its key is used; must equal the holder's delegate.
    pub delegatee: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = bridge,
        space = Checkpoints::space_for(0),
        seeds = [VOTES_SEED, delegatee.key().as_ref()],
        bump
    )]
    pub delegatee_votes: Account<'info, Checkpoints>,

    #[account(mut, seeds = [SUPPLY_SEED], bump = supply_checkpoints.bump)]
    pub supply_checkpoints: Account<'info, Checkpoints>,

    #[account(mut)]
    pub bridge: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(from: Pubkey)]
pub struct BridgeBurn<'info> {
    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = config.bump,
        constraint = config.bridge == bridge.key() @ ProxyError::Unauthorized
    )]
    pub config: Account<'info, ProxyConfig>,

    #[account(mut, seeds = [HOLDER_SEED, from.as_ref()], bump = holder.bump)]
    pub holder: Account<'info, Holder>,

    #[account(mut, seeds = [VOTES_SEED, holder.delegate.as_ref()], bump = delegatee_votes.bump)]
    pub delegatee_votes: Account<'info, Checkpoints>,

    #[account(mut, seeds = [SUPPLY_SEED], bump = supply_checkpoints.bump)]
    pub supply_checkpoints: Account<'info, Checkpoints>,

    #[account(mut)]
    pub bridge: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(to: Pubkey)]
pub struct Delegate<'info> {
    #[account(mut, seeds = [HOLDER_SEED, delegator.key().as_ref()], bump = holder.bump)]
    pub holder: Account<'info, Holder>,

    #[account(mut, seeds = [VOTES_SEED, holder.delegate.as_ref()], bump = old_delegate_votes.bump)]
    pub old_delegate_votes: Account<'info, Checkpoints>,

    #[account(
        init_if_needed,
        payer = delegator,
        space = Checkpoints::space_for(0),
        seeds = [VOTES_SEED, to.as_ref()],
        bump
    )]
    pub new_delegate_votes: Account<'info, Checkpoints>,

    #[account(mut)]
    pub delegator: Signer<'info>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
#[instruction(account: Pubkey)]
pub struct VotesView<'info> {
    /// CHECK: vote history of `account`; may not exist.
    #[account(seeds = [VOTES_SEED, account.as_ref()], bump)]
    pub votes: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct SupplyView<'info> {
    #[account(seeds = [CONFIG_SEED], bump = config.bump)]
    pub config: Account<'info, ProxyConfig>,

    #[account(seeds = [SUPPLY_SEED], bump = supply_checkpoints.bump)]
    pub supply_checkpoints: Account<'info, Checkpoints>,
}

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct HolderView<'info> {
    /// CHECK: holder record of `owner`; may not exist.
    #[account(seeds = [HOLDER_SEED, owner.as_ref()], bump)]
    pub holder: UncheckedAccount<'info>,
}
