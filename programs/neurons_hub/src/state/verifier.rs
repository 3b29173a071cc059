use anchor_lang::prelude::*;

use crate::{
    constants::{DOMAIN_NAME, DOMAIN_VERSION, EVM_ADDRESS_SIZE, SIGNATURE_LENGTH},
    errors::HubError,
    utils::{recover_signer, typed_data_hash, Attestation, Eip712Domain},
};

/// Trusted-signer configuration and EIP-712 domain of this deployment.
#[account]
#[derive(Default)]
pub struct VerifierConfig {
    /// Only key allowed to rotate the trusted signer.
    pub admin: Pubkey,
    /// EVM address of the off-chain attester.
    pub trusted_signer: [u8; EVM_ADDRESS_SIZE],
    /// `chainId` of the signing domain.
    pub chain_id: u64,
    /// `verifyingContract` of the signing domain, derived from the program id.
    pub verifying_contract: [u8; EVM_ADDRESS_SIZE],
    pub bump: u8,
}

impl VerifierConfig {
    pub const LEN: usize = 8 + 32 + EVM_ADDRESS_SIZE + 8 + EVM_ADDRESS_SIZE + 1;

    pub fn domain(&self) -> Eip712Domain<'static> {
        Eip712Domain {
            name: DOMAIN_NAME,
            version: DOMAIN_VERSION,
            chain_id: self.chain_id,
            verifying_contract: self.verifying_contract,
        }
    }

    pub fn domain_separator(&self) -> [u8; 32] {
        self.domain().separator()
    }

    pub fn build_message_hash(&self, recipient: Pubkey, amount: u64, nonce: [u8; 32], expiry: u64) -> [u8; 32] {
        let attestation = Attestation { recipient, amount, nonce, expiry };
        typed_data_hash(&self.domain_separator(), &attestation.struct_hash())
    }
}

/// Signature over an attestation plus the deadline it was signed with.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttestationProof {
    /// r ‖ s ‖ v
    pub signature: [u8; SIGNATURE_LENGTH],
    /// Unix timestamp after which the attestation is void.
    pub expiry: u64,
}

/// Admission seam between the minter and whatever authenticates attestations.
///
/// `Ok(false)` and `Err(_)` are both rejections; callers map the former to
/// `InvalidProof` and propagate the latter unchanged.
pub trait ProofVerifier {
    fn verify(&self, recipient: Pubkey, amount: u64, proof: &AttestationProof, nonce: [u8; 32], now: i64)
        -> Result<bool>;
}

impl ProofVerifier for VerifierConfig {
    fn verify(
        &self,
        recipient: Pubkey,
        amount: u64,
        proof: &AttestationProof,
        nonce: [u8; 32],
        now: i64,
    ) -> Result<bool> {
        // Expiries beyond i64::MAX never lapse.
        let expired = i64::try_from(proof.expiry).map_or(false, |expiry| now > expiry);
        require!(!expired, HubError::ExpiredProof);

        let digest = self.build_message_hash(recipient, amount, nonce, proof.expiry);
        let recovered = recover_signer(&digest, &proof.signature)?;
        require!(recovered == self.trusted_signer, HubError::InvalidSigner);

        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::utils::{test_signing, verifying_contract};
    use libsecp256k1::SecretKey;

    pub struct Attester {
        pub key: SecretKey,
        pub config: VerifierConfig,
    }

    impl Attester {
        pub fn new(key_byte: u8) -> Self {
            let key = test_signing::secret(key_byte);
            let config = VerifierConfig {
                admin: Pubkey::new_unique(),
                trusted_signer: test_signing::address_of(&key),
                chain_id: 1,
                verifying_contract: verifying_contract(&crate::ID),
                bump: 254,
            };
            Self { key, config }
        }

        pub fn attest(&self, recipient: Pubkey, amount: u64, nonce: [u8; 32], expiry: u64) -> AttestationProof {
            self.attest_with(&self.key, recipient, amount, nonce, expiry)
        }

        /// Signs against this attester's domain with an arbitrary key.
        pub fn attest_with(
            &self,
            key: &SecretKey,
            recipient: Pubkey,
            amount: u64,
            nonce: [u8; 32],
            expiry: u64,
        ) -> AttestationProof {
            let digest = self.config.build_message_hash(recipient, amount, nonce, expiry);
            AttestationProof { signature: test_signing::sign(&digest, key), expiry }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{test_fixtures::Attester, *};
    use crate::utils::test_signing;

    const NOW: i64 = 1_706_400_000;

    fn assert_code(result: Result<bool>, expected: HubError) {
        match result {
            Err(Error::AnchorError(e)) => assert_eq!(e.error_code_number, u32::from(expected)),
            other => panic!("expected {:?}, got {:?}", expected, other),
        }
    }

    #[test]
    fn accepts_trusted_signer_attestation() {
        let attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest(recipient, 500, [1u8; 32], (NOW + 3600) as u64);

        assert!(attester.config.verify(recipient, 500, &proof, [1u8; 32], NOW).unwrap());
    }

    #[test]
    fn expiry_is_inclusive() {
        let attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest(recipient, 500, [1u8; 32], NOW as u64);

        assert!(attester.config.verify(recipient, 500, &proof, [1u8; 32], NOW).unwrap());
        assert_code(attester.config.verify(recipient, 500, &proof, [1u8; 32], NOW + 1), HubError::ExpiredProof);
    }

    #[test]
    fn rejects_foreign_signer() {
        let attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest_with(&test_signing::secret(12), recipient, 500, [1u8; 32], (NOW + 60) as u64);

        assert_code(attester.config.verify(recipient, 500, &proof, [1u8; 32], NOW), HubError::InvalidSigner);
    }

    #[test]
    fn rejects_tampered_fields() {
        let attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest(recipient, 500, [1u8; 32], (NOW + 60) as u64);

        assert_code(attester.config.verify(recipient, 501, &proof, [1u8; 32], NOW), HubError::InvalidSigner);
        assert_code(attester.config.verify(recipient, 500, &proof, [2u8; 32], NOW), HubError::InvalidSigner);
        assert_code(
            attester.config.verify(Pubkey::new_unique(), 500, &proof, [1u8; 32], NOW),
            HubError::InvalidSigner,
        );

        let extended = AttestationProof { expiry: proof.expiry + 1, ..proof };
        assert_code(attester.config.verify(recipient, 500, &extended, [1u8; 32], NOW), HubError::InvalidSigner);
    }

    #[test]
    fn rotated_signer_invalidates_old_attestations() {
        let mut attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest(recipient, 500, [1u8; 32], (NOW + 60) as u64);

        attester.config.trusted_signer = test_signing::address_of(&test_signing::secret(13));
        assert_code(attester.config.verify(recipient, 500, &proof, [1u8; 32], NOW), HubError::InvalidSigner);
    }

    #[test]
    fn domain_is_bound_to_chain() {
        let attester = Attester::new(11);
        let recipient = Pubkey::new_unique();
        let proof = attester.attest(recipient, 500, [1u8; 32], (NOW + 60) as u64);

        let other_chain = VerifierConfig { chain_id: 5, ..attester.config.clone() };
        assert_code(other_chain.verify(recipient, 500, &proof, [1u8; 32], NOW), HubError::InvalidSigner);
    }
}
