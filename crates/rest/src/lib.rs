//! REST collaborator boundary for the storefront client.
//!
//! This crate owns everything that touches the wire:
//! - [`SessionContext`]: the authenticated identity threaded through every
//!   call, with a single token-normalisation point
//! - [`RestError`]: the remote/network error taxonomy with human-readable
//!   messages derived from HTTP status codes
//! - validated wire records (parse, don't trust)
//! - collaborator traits for the auth, product, cart, order, profile, and
//!   sales services, each with an HTTP implementation ([`RestClient`]) and
//!   an in-memory fake for tests

pub mod collaborators;
pub mod envelope;
pub mod error;
pub mod http;
pub mod records;
pub mod session;

pub use collaborators::{
    AuthApi, CartApi, InMemoryAuthService, InMemoryCartService, InMemoryOrderService,
    InMemoryProductService, InMemoryProfileService, InMemorySalesService, OrderApi, PlaceOrderLine,
    ProductApi, ProfileApi, SalesApi,
};
pub use envelope::ApiResponse;
pub use error::RestError;
pub use http::RestClient;
pub use records::{
    Address, CartEntry, LoginRequest, LoginResponse, NewAddress, NewPaymentMethod, NewProduct,
    OrderLineRecord, OrderRecord, PaymentMethod, Product, RegisterRequest, UserProfile,
};
pub use session::SessionContext;

/// Convenience result alias for collaborator calls.
pub type Result<T> = std::result::Result<T, RestError>;
