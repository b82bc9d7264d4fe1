//! Profile collaborator trait and in-memory implementation.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::AddressId;

use crate::error::RestError;
use crate::records::{Address, NewAddress, NewPaymentMethod, PaymentMethod, UserProfile};
use crate::session::SessionContext;

/// Remote profile operations: user details, shipping addresses, and stored
/// payment methods.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    /// Fetches the session user's account details.
    async fn user_details(&self, session: &SessionContext) -> Result<UserProfile, RestError>;

    /// Fetches the session user's saved shipping addresses.
    async fn addresses(&self, session: &SessionContext) -> Result<Vec<Address>, RestError>;

    /// Saves a new shipping address.
    async fn add_address(
        &self,
        session: &SessionContext,
        address: &NewAddress,
    ) -> Result<(), RestError>;

    /// Fetches the session user's stored payment methods.
    async fn payment_methods(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<PaymentMethod>, RestError>;

    /// Stores a new payment method.
    async fn add_payment_method(
        &self,
        session: &SessionContext,
        method: &NewPaymentMethod,
    ) -> Result<(), RestError>;
}

#[derive(Debug, Default)]
struct InMemoryProfileState {
    profile: Option<UserProfile>,
    addresses: Vec<Address>,
    payment_methods: Vec<PaymentMethod>,
    next_address_id: i64,
    fail_on_mutation: bool,
}

/// In-memory profile service for tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileService {
    state: Arc<RwLock<InMemoryProfileState>>,
}

impl InMemoryProfileService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the profile record returned by [`ProfileApi::user_details`].
    pub fn set_profile(&self, profile: UserProfile) {
        self.state.write().unwrap().profile = Some(profile);
    }

    /// Seeds a saved address, returning its id.
    pub fn seed_address(&self, street: &str, city: &str, state_name: &str, pincode: &str) -> AddressId {
        let mut state = self.state.write().unwrap();
        state.next_address_id += 1;
        let id = AddressId::new(state.next_address_id);
        state.addresses.push(Address {
            address_id: id,
            street: street.into(),
            city: city.into(),
            state: state_name.into(),
            pincode: pincode.into(),
        });
        id
    }

    /// Seeds a stored payment method.
    pub fn seed_payment_method(&self, kind: &str, value: &str) {
        self.state.write().unwrap().payment_methods.push(PaymentMethod {
            kind: kind.into(),
            value: value.into(),
        });
    }

    /// Configures mutations to fail until cleared.
    pub fn set_fail_on_mutation(&self, fail: bool) {
        self.state.write().unwrap().fail_on_mutation = fail;
    }
}

#[async_trait]
impl ProfileApi for InMemoryProfileService {
    async fn user_details(&self, _session: &SessionContext) -> Result<UserProfile, RestError> {
        self.state
            .read()
            .unwrap()
            .profile
            .clone()
            .ok_or_else(|| RestError::from_status(404, "user not found"))
    }

    async fn addresses(&self, _session: &SessionContext) -> Result<Vec<Address>, RestError> {
        Ok(self.state.read().unwrap().addresses.clone())
    }

    async fn add_address(
        &self,
        _session: &SessionContext,
        address: &NewAddress,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(RestError::from_status(500, "injected profile failure"));
        }
        state.next_address_id += 1;
        let id = AddressId::new(state.next_address_id);
        state.addresses.push(Address {
            address_id: id,
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            pincode: address.pincode.clone(),
        });
        Ok(())
    }

    async fn payment_methods(
        &self,
        _session: &SessionContext,
    ) -> Result<Vec<PaymentMethod>, RestError> {
        Ok(self.state.read().unwrap().payment_methods.clone())
    }

    async fn add_payment_method(
        &self,
        _session: &SessionContext,
        method: &NewPaymentMethod,
    ) -> Result<(), RestError> {
        let mut state = self.state.write().unwrap();
        if state.fail_on_mutation {
            return Err(RestError::from_status(500, "injected profile failure"));
        }
        state.payment_methods.push(PaymentMethod {
            kind: method.kind.clone(),
            value: method.value.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::UserId;

    fn session() -> SessionContext {
        SessionContext::new(UserId::new(1), "token")
    }

    #[tokio::test]
    async fn test_seeded_address_round_trip() {
        let service = InMemoryProfileService::new();
        let id = service.seed_address("12 MG Road", "Bengaluru", "KA", "560001");

        let addresses = service.addresses(&session()).await.unwrap();
        assert_eq!(addresses.len(), 1);
        assert_eq!(addresses[0].address_id, id);
        assert_eq!(addresses[0].city, "Bengaluru");
    }

    #[tokio::test]
    async fn test_add_address_assigns_id() {
        let service = InMemoryProfileService::new();
        service
            .add_address(
                &session(),
                &NewAddress {
                    user_id: UserId::new(1),
                    street: "4 Park St".into(),
                    city: "Kolkata".into(),
                    state: "WB".into(),
                    pincode: "700016".into(),
                },
            )
            .await
            .unwrap();

        let addresses = service.addresses(&session()).await.unwrap();
        assert_eq!(addresses[0].address_id, AddressId::new(1));
    }

    #[tokio::test]
    async fn test_payment_methods() {
        let service = InMemoryProfileService::new();
        service.seed_payment_method("UPI", "asha@upi");

        let methods = service.payment_methods(&session()).await.unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].kind, "UPI");
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let service = InMemoryProfileService::new();
        let result = service.user_details(&session()).await;
        assert_eq!(result.unwrap_err().status_code(), Some(404));
    }
}
