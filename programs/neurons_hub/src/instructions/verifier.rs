use anchor_lang::prelude::*;

use crate::{
    constants::{EVM_ADDRESS_SIZE, VERIFIER_CONFIG_SEED},
    errors::HubError,
    events::TrustedSignerUpdated,
    state::{AttestationProof, ProofVerifier, VerifierConfig},
    utils::verifying_contract,
};

#[derive(Accounts)]
pub struct InitializeVerifier<'info> {
    #[account(
        init,
        payer = admin,
        space = VerifierConfig::LEN,
        seeds = [VERIFIER_CONFIG_SEED],
        bump
    )]
    pub verifier_config: Account<'info, VerifierConfig>,

    #[account(mut)]
    pub admin: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn initialize_verifier(
    ctx: Context<InitializeVerifier>,
    trusted_signer: [u8; EVM_ADDRESS_SIZE],
    chain_id: u64,
) -> Result<()> {
    require!(trusted_signer != [0u8; EVM_ADDRESS_SIZE], HubError::ZeroAddress);

    let config = &mut ctx.accounts.verifier_config;
    config.admin = ctx.accounts.admin.key();
    config.trusted_signer = trusted_signer;
    config.chain_id = chain_id;
    config.verifying_contract = verifying_contract(&crate::ID);
    config.bump = ctx.bumps.verifier_config;

    emit!(TrustedSignerUpdated {
        old_signer: [0u8; EVM_ADDRESS_SIZE],
        new_signer: trusted_signer,
        admin: config.admin,
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!(
        "Verifier initialized: signer 0x{} chain {} domain 0x{}",
        hex::encode(trusted_signer),
        chain_id,
        hex::encode(config.domain_separator())
    );

    Ok(())
}

#[derive(Accounts)]
pub struct SetTrustedSigner<'info> {
    #[account(
        mut,
        seeds = [VERIFIER_CONFIG_SEED],
        bump = verifier_config.bump,
        constraint = verifier_config.admin == admin.key() @ HubError::UnauthorizedAdmin
    )]
    pub verifier_config: Account<'info, VerifierConfig>,

    pub admin: Signer<'info>,
}

pub fn set_trusted_signer(ctx: Context<SetTrustedSigner>, new_signer: [u8; EVM_ADDRESS_SIZE]) -> Result<()> {
    require!(new_signer != [0u8; EVM_ADDRESS_SIZE], HubError::ZeroAddress);

    let config = &mut ctx.accounts.verifier_config;
    let old_signer = config.trusted_signer;
    config.trusted_signer = new_signer;

    emit!(TrustedSignerUpdated {
        old_signer,
        new_signer,
        admin: ctx.accounts.admin.key(),
        timestamp: Clock::get()?.unix_timestamp,
    });
    msg!("Trusted signer: 0x{} -> 0x{}", hex::encode(old_signer), hex::encode(new_signer));

    Ok(())
}

#[derive(Accounts)]
pub struct VerifierView<'info> {
    #[account(seeds = [VERIFIER_CONFIG_SEED], bump = verifier_config.bump)]
    pub verifier_config: Account<'info, VerifierConfig>,
}

pub fn verify(
    ctx: Context<VerifierView>,
    recipient: Pubkey,
    amount: u64,
    proof: AttestationProof,
    nonce: [u8; 32],
) -> Result<bool> {
    let now = Clock::get()?.unix_timestamp;
    ctx.accounts.verifier_config.verify(recipient, amount, &proof, nonce, now)
}

pub fn domain_separator(ctx: Context<VerifierView>) -> Result<[u8; 32]> {
    Ok(ctx.accounts.verifier_config.domain_separator())
}

pub fn build_message_hash(
    ctx: Context<VerifierView>,
    recipient: Pubkey,
    amount: u64,
    nonce: [u8; 32],
    expiry: u64,
) -> Result<[u8; 32]> {
    Ok(ctx.accounts.verifier_config.build_message_hash(recipient, amount, nonce, expiry))
}
