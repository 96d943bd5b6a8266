//! Local view of an account

use vela_primitives::{Address, Nonce, TokenAmount};

use crate::types::{AccountOnNetwork, GuardianData};
use crate::{ProxyProvider, SdkError, Signer, Transaction};

/// Address, nonce and balance of an account as the client tracks them.
///
/// The network is authoritative: [`Account::sync_from_network`] overwrites
/// local state. Between syncs the nonce moves through
/// [`Account::sign_transaction`], which advances it once per signed
/// transaction, or explicitly through [`Account::increment_nonce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account address
    pub address: Address,
    /// Nonce the next transaction will use
    pub nonce: Nonce,
    /// Native balance
    pub balance: TokenAmount,
    /// Whether transactions need a guardian co-signature
    pub guarded: bool,
    /// Active guardian
    pub guardian: Option<Address>,
}

impl Account {
    /// Fresh local account with nonce 0
    pub fn new(address: Address) -> Self {
        Self {
            address,
            nonce: 0,
            balance: TokenAmount::native(0u8),
            guarded: false,
            guardian: None,
        }
    }

    /// Overwrite nonce, balance and guardian state from the network
    pub async fn sync_from_network(&mut self, provider: &ProxyProvider) -> Result<(), SdkError> {
        let on_network = provider.get_account(&self.address).await?;
        let guardian_data = provider.get_guardian_data(&self.address).await?;
        self.update(&on_network, &guardian_data);
        tracing::debug!(
            address = %self.address,
            nonce = self.nonce,
            guarded = self.guarded,
            "account synced"
        );
        Ok(())
    }

    /// Apply fetched state
    pub fn update(&mut self, on_network: &AccountOnNetwork, guardian_data: &GuardianData) {
        self.nonce = on_network.nonce;
        self.balance = TokenAmount::native(on_network.balance.clone());
        self.guarded = guardian_data.guarded;
        self.guardian = guardian_data.active_guardian.as_ref().map(|g| g.address);
    }

    /// Advance the nonce by one after a transaction using it was signed
    pub fn increment_nonce(&mut self) {
        self.nonce += 1;
    }

    /// Sign `tx` as this account and advance the nonce.
    ///
    /// The transaction must come from this account and carry its current
    /// nonce. The nonce is left untouched when signing fails.
    pub async fn sign_transaction(
        &mut self,
        tx: &mut Transaction,
        signer: &dyn Signer,
    ) -> Result<(), SdkError> {
        if tx.sender != self.address {
            return Err(SdkError::TxBuild(format!(
                "transaction sender {} is not account {}",
                tx.sender, self.address
            )));
        }
        if tx.nonce != self.nonce {
            return Err(SdkError::TxBuild(format!(
                "transaction nonce {} does not match account nonce {}",
                tx.nonce, self.nonce
            )));
        }
        tx.sign(signer).await?;
        self.increment_nonce();
        tracing::debug!(
            address = %self.address,
            nonce = self.nonce,
            "transaction signed, nonce advanced"
        );
        Ok(())
    }

    /// Current nonce, then advance it
    pub fn get_nonce_then_increment(&mut self) -> Nonce {
        let nonce = self.nonce;
        self.increment_nonce();
        nonce
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Guardian;
    use num_bigint::BigUint;

    #[test]
    fn test_new_account_starts_at_zero() {
        let account = Account::new(Address::ZERO);
        assert_eq!(account.nonce, 0);
        assert!(account.balance.is_zero());
        assert!(!account.guarded);
    }

    #[test]
    fn test_increment_nonce() {
        let mut account = Account::new(Address::ZERO);
        account.nonce = 41;
        assert_eq!(account.get_nonce_then_increment(), 41);
        assert_eq!(account.nonce, 42);
        account.increment_nonce();
        assert_eq!(account.nonce, 43);
    }

    #[test]
    fn test_update_overwrites_local_state() {
        let mut account = Account::new(Address::ZERO);
        account.nonce = 100;

        let guardian = Address::from_bytes([9u8; 32]);
        let on_network = AccountOnNetwork {
            address: Address::ZERO,
            nonce: 7,
            balance: BigUint::from(5u8),
            username: None,
            extra: Default::default(),
        };
        let guardian_data = GuardianData {
            guarded: true,
            active_guardian: Some(Guardian {
                address: guardian,
                activation_epoch: 1,
                service_uid: "svc".to_string(),
            }),
            pending_guardian: None,
        };
        account.update(&on_network, &guardian_data);

        assert_eq!(account.nonce, 7);
        assert_eq!(account.balance.amount, BigUint::from(5u8));
        assert!(account.guarded);
        assert_eq!(account.guardian, Some(guardian));
    }
}
