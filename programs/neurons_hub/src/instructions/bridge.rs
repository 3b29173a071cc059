use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount, Transfer};

use crate::{
    constants::{
        BRIDGE_CONFIG_SEED, LEDGER_SEED, MAX_ADAPTER_PARAMS_LEN, RECEIVED_MESSAGE_SEED, REMOTE_CHAIN_SEED,
    },
    errors::HubError,
    events::{
        BridgeModeChanged, BridgePauseChanged, EmergencyWithdrawal, EndpointUpdated, RemoteAllowed, TokensReceived,
        TokensSent, TrustedRemoteSet,
    },
    instructions::require_role,
    state::{
        BridgeConfig, BridgeMode, BridgeStats, ChainStats, LedgerAuthority, ReceivedMessage, RemoteChain, Role,
        SendFee,
    },
    utils::{create_pda_account, is_initialized, load_optional, store},
};

#[derive(Accounts)]
pub struct InitializeBridge<'info> {
    #[account(
        init,
        payer = admin,
        space = BridgeConfig::LEN,
        seeds = [BRIDGE_CONFIG_SEED],
        bump
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Account<'info, LedgerAuthority>,

    /// Custody must belong to the bridge PDA and hold the home token.
    #[account(
        constraint = custody.mint == ledger.mint @ HubError::InvalidMint,
        constraint = custody.owner == bridge_config.key() @ HubError::InvalidAccount
    )]
    pub custody: Account<'info, TokenAccount>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_bridge(ctx: Context<InitializeBridge>, mode: BridgeMode) -> Result<()> {
    let config = &mut ctx.accounts.bridge_config;
    config.admin = ctx.accounts.admin.key();
    config.mint = ctx.accounts.ledger.mint;
    config.custody = ctx.accounts.custody.key();
    config.endpoint = Pubkey::default();
    config.mode = mode;
    config.paused = false;
    config.bump = ctx.bumps.bridge_config;

    emit!(BridgeModeChanged { mode, admin: config.admin, timestamp: Clock::get()?.unix_timestamp });
    msg!("Bridge initialized: mint {} custody {} mode {:?}", config.mint, config.custody, mode);

    Ok(())
}

#[derive(Accounts)]
pub struct BridgeAdmin<'info> {
    #[account(
        mut,
        seeds = [BRIDGE_CONFIG_SEED],
        bump = bridge_config.bump,
        constraint = bridge_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    pub admin: Signer<'info>,
}

pub fn set_endpoint(ctx: Context<BridgeAdmin>, endpoint: Pubkey) -> Result<()> {
    require_keys_neq!(endpoint, Pubkey::default(), HubError::ZeroAddress);

    let config = &mut ctx.accounts.bridge_config;
    let old_endpoint = config.endpoint;
    config.endpoint = endpoint;

    emit!(EndpointUpdated { old_endpoint, new_endpoint: endpoint, timestamp: Clock::get()?.unix_timestamp });
    msg!("Bridge endpoint: {} -> {}", old_endpoint, endpoint);

    Ok(())
}

pub fn set_bridge_mode(ctx: Context<BridgeAdmin>, burn_mint: bool) -> Result<()> {
    let mode = if burn_mint { BridgeMode::BurnMint } else { BridgeMode::LockUnlock };
    ctx.accounts.bridge_config.mode = mode;

    emit!(BridgeModeChanged { mode, admin: ctx.accounts.admin.key(), timestamp: Clock::get()?.unix_timestamp });
    msg!("Bridge mode: {:?}", mode);

    Ok(())
}

pub fn set_bridge_paused(ctx: Context<BridgeAdmin>, paused: bool) -> Result<()> {
    ctx.accounts.bridge_config.paused = paused;

    emit!(BridgePauseChanged { paused, admin: ctx.accounts.admin.key(), timestamp: Clock::get()?.unix_timestamp });
    msg!("Bridge paused: {}", paused);

    Ok(())
}

#[derive(Accounts)]
#[instruction(chain_id: u32)]
pub struct ConfigureRemote<'info> {
    #[account(
        mut,
        seeds = [BRIDGE_CONFIG_SEED],
        bump = bridge_config.bump,
        constraint = bridge_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    #[account(
        init_if_needed,
        payer = admin,
        space = RemoteChain::LEN,
        seeds = [REMOTE_CHAIN_SEED, chain_id.to_le_bytes().as_ref()],
        bump
    )]
    pub remote_chain: Account<'info, RemoteChain>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

impl ConfigureRemote<'_> {
    fn bind(&mut self, chain_id: u32, bump: u8) {
        self.remote_chain.chain_id = chain_id;
        self.remote_chain.bump = bump;
    }
}

pub fn allow_remote(ctx: Context<ConfigureRemote>, chain_id: u32, allowed: bool) -> Result<()> {
    ctx.accounts.bind(chain_id, ctx.bumps.remote_chain);

    let accounts = ctx.accounts;
    let changed = accounts.bridge_config.set_chain_allowed(&mut accounts.remote_chain, allowed)?;
    let active_chain_count = accounts.bridge_config.active_chain_count;

    emit!(RemoteAllowed { chain_id, allowed, active_chain_count, timestamp: Clock::get()?.unix_timestamp });
    msg!("Remote chain {} allowed: {} (changed: {}, active: {})", chain_id, allowed, changed, active_chain_count);

    Ok(())
}

pub fn set_trusted_remote(ctx: Context<ConfigureRemote>, chain_id: u32, trusted_remote: Vec<u8>) -> Result<()> {
    ctx.accounts.bind(chain_id, ctx.bumps.remote_chain);
    ctx.accounts.remote_chain.set_trusted_remote(trusted_remote.clone())?;

    msg!("Trusted remote for chain {}: 0x{}", chain_id, hex::encode(&trusted_remote));
    emit!(TrustedRemoteSet { chain_id, trusted_remote, timestamp: Clock::get()?.unix_timestamp });

    Ok(())
}

#[derive(Accounts)]
#[instruction(dst_chain_id: u32)]
pub struct SendTokens<'info> {
    #[account(mut, seeds = [BRIDGE_CONFIG_SEED], bump = bridge_config.bump)]
    pub bridge_config: Account<'info, BridgeConfig>,

    /// CHECK: chain record; may not exist, which reads as not allowed.
    #[account(mut, seeds = [REMOTE_CHAIN_SEED, dst_chain_id.to_le_bytes().as_ref()], bump)]
    pub remote_chain: UncheckedAccount<'info>,

    /// CHECK: access map entry (Burner, bridge_config); checked under BurnMint only.
    pub burner_role: UncheckedAccount<'info>,

    #[account(mut, address = bridge_config.mint @ HubError::InvalidMint)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = sender_tokens.mint == bridge_config.mint @ HubError::InvalidMint,
        constraint = sender_tokens.owner == sender.key() @ HubError::InvalidAccount
    )]
    pub sender_tokens: Account<'info, TokenAccount>,

    #[account(mut, address = bridge_config.custody @ HubError::InvalidAccount)]
    pub custody: Account<'info, TokenAccount>,

    pub sender: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn send_tokens(
    ctx: Context<SendTokens>,
    dst_chain_id: u32,
    recipient: [u8; 32],
    amount: u64,
    params: Vec<u8>,
) -> Result<()> {
    let accounts = ctx.accounts;
    let mut chain =
        load_optional::<RemoteChain>(&accounts.remote_chain)?.unwrap_or(RemoteChain::unconfigured(dst_chain_id));

    accounts.bridge_config.check_send(&chain, &recipient, amount)?;
    require!(params.len() <= MAX_ADAPTER_PARAMS_LEN, HubError::AdapterParamsTooLong);

    let mode = accounts.bridge_config.mode;
    match mode {
        BridgeMode::BurnMint => {
            require_role(&accounts.burner_role, &accounts.bridge_config.key(), Role::Burner)?;
            token::burn(
                CpiContext::new(
                    accounts.token_program.to_account_info(),
                    Burn {
                        mint: accounts.mint.to_account_info(),
                        from: accounts.sender_tokens.to_account_info(),
                        authority: accounts.sender.to_account_info(),
                    },
                ),
                amount,
            )?;
        }
        BridgeMode::LockUnlock => {
            token::transfer(
                CpiContext::new(
                    accounts.token_program.to_account_info(),
                    Transfer {
                        from: accounts.sender_tokens.to_account_info(),
                        to: accounts.custody.to_account_info(),
                        authority: accounts.sender.to_account_info(),
                    },
                ),
                amount,
            )?;
        }
    }

    let nonce = accounts.bridge_config.record_sent(&mut chain, amount)?;
    store(&accounts.remote_chain, &chain)?;

    let sender = accounts.sender.key();
    emit!(TokensSent {
        sender,
        dst_chain_id,
        trusted_remote: chain.trusted_remote,
        recipient,
        amount,
        nonce,
        mode,
        params,
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("Sent {} to chain {} recipient 0x{} nonce {}", amount, dst_chain_id, hex::encode(recipient), nonce);

    Ok(())
}

#[derive(Accounts)]
#[instruction(src_chain_id: u32, message_id: [u8; 32], recipient: Pubkey)]
pub struct ReceiveTokens<'info> {
    #[account(mut, seeds = [BRIDGE_CONFIG_SEED], bump = bridge_config.bump)]
    pub bridge_config: Account<'info, BridgeConfig>,

    /// CHECK: chain record; may not exist, which reads as not allowed.
    #[account(mut, seeds = [REMOTE_CHAIN_SEED, src_chain_id.to_le_bytes().as_ref()], bump)]
    pub remote_chain: UncheckedAccount<'info>,

    /// CHECK: delivery marker of `message_id`; validated by `require_undelivered`.
    #[account(mut, seeds = [RECEIVED_MESSAGE_SEED, message_id.as_ref()], bump)]
    pub received_message: UncheckedAccount<'info>,

    #[account(seeds = [LEDGER_SEED], bump = ledger.bump)]
    pub ledger: Account<'info, LedgerAuthority>,

    /// CHECK: access map entry (Minter, bridge_config); checked under BurnMint only.
    pub minter_role: UncheckedAccount<'info>,

    #[account(mut, address = bridge_config.mint @ HubError::InvalidMint)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = recipient_tokens.mint == bridge_config.mint @ HubError::InvalidMint,
        constraint = recipient_tokens.owner == recipient @ HubError::InvalidAccount
    )]
    pub recipient_tokens: Account<'info, TokenAccount>,

    #[account(mut, address = bridge_config.custody @ HubError::InvalidAccount)]
    pub custody: Account<'info, TokenAccount>,

    #[account(mut)]
    pub endpoint: Signer<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn receive_tokens(
    ctx: Context<ReceiveTokens>,
    src_chain_id: u32,
    message_id: [u8; 32],
    recipient: Pubkey,
    amount: u64,
) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;
    let accounts = ctx.accounts;
    let mut chain =
        load_optional::<RemoteChain>(&accounts.remote_chain)?.unwrap_or(RemoteChain::unconfigured(src_chain_id));

    accounts.bridge_config.check_receive(&accounts.endpoint.key(), &chain, &recipient, amount)?;
    require_undelivered(&accounts.received_message)?;

    let mode = accounts.bridge_config.mode;
    match mode {
        BridgeMode::BurnMint => {
            require_role(&accounts.minter_role, &accounts.bridge_config.key(), Role::Minter)?;
            let ledger_seeds: &[&[u8]] = &[LEDGER_SEED, &[accounts.ledger.bump]];
            token::mint_to(
                CpiContext::new_with_signer(
                    accounts.token_program.to_account_info(),
                    MintTo {
                        mint: accounts.mint.to_account_info(),
                        to: accounts.recipient_tokens.to_account_info(),
                        authority: accounts.ledger.to_account_info(),
                    },
                    &[ledger_seeds],
                ),
                amount,
            )?;
        }
        BridgeMode::LockUnlock => {
            accounts.bridge_config.check_custody(accounts.custody.amount, amount)?;
            let bridge_seeds: &[&[u8]] = &[BRIDGE_CONFIG_SEED, &[accounts.bridge_config.bump]];
            token::transfer(
                CpiContext::new_with_signer(
                    accounts.token_program.to_account_info(),
                    Transfer {
                        from: accounts.custody.to_account_info(),
                        to: accounts.recipient_tokens.to_account_info(),
                        authority: accounts.bridge_config.to_account_info(),
                    },
                    &[bridge_seeds],
                ),
                amount,
            )?;
        }
    }

    accounts.bridge_config.record_received(&mut chain, amount)?;
    store(&accounts.remote_chain, &chain)?;

    let marker_bump = [ctx.bumps.received_message];
    let marker = accounts.received_message.to_account_info();
    create_pda_account(
        &accounts.endpoint.to_account_info(),
        &marker,
        &accounts.system_program.to_account_info(),
        ReceivedMessage::LEN,
        &[RECEIVED_MESSAGE_SEED, message_id.as_ref(), &marker_bump],
    )?;
    store(&marker, &ReceivedMessage { message_id, src_chain_id, recipient, amount, received_at: now })?;

    emit!(TokensReceived { src_chain_id, message_id, recipient, amount, mode, timestamp: now });
    msg!("Received {} from chain {} for {} message 0x{}", amount, src_chain_id, recipient, hex::encode(message_id));

    Ok(())
}

/// Fails `MessageReplayed` once a marker exists for the message.
fn require_undelivered(marker: &AccountInfo) -> Result<()> {
    require!(!is_initialized(marker), HubError::MessageReplayed);
    Ok(())
}

#[derive(Accounts)]
pub struct EmergencyWithdraw<'info> {
    #[account(
        seeds = [BRIDGE_CONFIG_SEED],
        bump = bridge_config.bump,
        constraint = bridge_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub bridge_config: Account<'info, BridgeConfig>,

    #[account(mut, address = bridge_config.custody @ HubError::InvalidAccount)]
    pub custody: Account<'info, TokenAccount>,

    #[account(mut, constraint = destination.mint == bridge_config.mint @ HubError::InvalidMint)]
    pub destination: Account<'info, TokenAccount>,

    pub admin: Signer<'info>,

    pub token_program: Program<'info, Token>,
}

pub fn emergency_withdraw(ctx: Context<EmergencyWithdraw>, amount: u64) -> Result<()> {
    let accounts = ctx.accounts;
    let withdrawal = accounts.bridge_config.emergency_withdrawal(accounts.custody.amount, amount)?;

    if let Some(amount) = withdrawal {
        let bridge_seeds: &[&[u8]] = &[BRIDGE_CONFIG_SEED, &[accounts.bridge_config.bump]];
        token::transfer(
            CpiContext::new_with_signer(
                accounts.token_program.to_account_info(),
                Transfer {
                    from: accounts.custody.to_account_info(),
                    to: accounts.destination.to_account_info(),
                    authority: accounts.bridge_config.to_account_info(),
                },
                &[bridge_seeds],
            ),
            amount,
        )?;
    }

    emit!(EmergencyWithdrawal {
        to: accounts.destination.key(),
        amount,
        executed: withdrawal.is_some(),
        admin: accounts.admin.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    match withdrawal {
        Some(_) => msg!("Emergency withdrawal of {} to {}", amount, accounts.destination.key()),
        None => msg!("Emergency withdrawal skipped: bridge holds no custody in BurnMint mode"),
    }

    Ok(())
}

#[derive(Accounts)]
pub struct BridgeView<'info> {
    #[account(seeds = [BRIDGE_CONFIG_SEED], bump = bridge_config.bump)]
    pub bridge_config: Account<'info, BridgeConfig>,
}

pub fn get_bridge_stats(ctx: Context<BridgeView>) -> Result<BridgeStats> {
    Ok(ctx.accounts.bridge_config.stats())
}

pub fn estimate_send_fee(
    _ctx: Context<BridgeView>,
    dst_chain_id: u32,
    recipient: [u8; 32],
    amount: u64,
    use_alt_fee_token: bool,
    params: Vec<u8>,
) -> Result<SendFee> {
    Ok(BridgeConfig::estimate_send_fee(dst_chain_id, &recipient, amount, use_alt_fee_token, &params))
}

#[derive(Accounts)]
#[instruction(chain_id: u32)]
pub struct ChainView<'info> {
    /// CHECK: chain record; may not exist, which reads as not allowed.
    #[account(seeds = [REMOTE_CHAIN_SEED, chain_id.to_le_bytes().as_ref()], bump)]
    pub remote_chain: UncheckedAccount<'info>,
}

impl ChainView<'_> {
    fn chain(&self, chain_id: u32) -> Result<RemoteChain> {
        Ok(load_optional::<RemoteChain>(&self.remote_chain)?.unwrap_or(RemoteChain::unconfigured(chain_id)))
    }
}

pub fn get_chain_stats(ctx: Context<ChainView>, chain_id: u32) -> Result<ChainStats> {
    Ok(ctx.accounts.chain(chain_id)?.stats())
}

pub fn is_chain_allowed(ctx: Context<ChainView>, chain_id: u32) -> Result<bool> {
    Ok(ctx.accounts.chain(chain_id)?.allowed)
}

pub fn get_trusted_remote(ctx: Context<ChainView>, chain_id: u32) -> Result<Vec<u8>> {
    Ok(ctx.accounts.chain(chain_id)?.trusted_remote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(result: Result<()>) -> u32 {
        match result {
            Err(Error::AnchorError(e)) => e.error_code_number,
            other => panic!("expected program error, got {:?}", other),
        }
    }

    fn marker(message_id: [u8; 32]) -> Pubkey {
        Pubkey::find_program_address(&[RECEIVED_MESSAGE_SEED, message_id.as_ref()], &crate::ID).0
    }

    fn delivered(message_id: [u8; 32]) -> Vec<u8> {
        let record = ReceivedMessage {
            message_id,
            src_chain_id: 101,
            recipient: Pubkey::new_unique(),
            amount: 25,
            received_at: 1_706_400_000,
        };
        let mut data = Vec::new();
        record.try_serialize(&mut data).unwrap();
        data
    }

    #[test]
    fn first_delivery_is_accepted() {
        let key = marker([1u8; 32]);
        let owner = System::id();
        let (mut lamports, mut data) = (0u64, Vec::new());
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &owner, false, 0);

        require_undelivered(&info).unwrap();
    }

    #[test]
    fn redelivery_of_same_message_fails() {
        let message_id = [2u8; 32];
        let key = marker(message_id);
        let (mut lamports, mut data) = (1_000_000u64, delivered(message_id));
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &crate::ID, false, 0);

        assert_eq!(code_of(require_undelivered(&info)), u32::from(HubError::MessageReplayed));
    }

    #[test]
    fn prefunded_marker_is_not_a_delivery() {
        // Lamports sent to the marker address ahead of time must not block the message.
        let key = marker([3u8; 32]);
        let owner = System::id();
        let (mut lamports, mut data) = (5_000u64, Vec::new());
        let info = AccountInfo::new(&key, false, true, &mut lamports, &mut data, &owner, false, 0);

        require_undelivered(&info).unwrap();
    }

    #[test]
    fn markers_are_per_message() {
        assert_ne!(marker([4u8; 32]), marker([5u8; 32]));
        assert_eq!(marker([4u8; 32]), marker([4u8; 32]));
    }
}
