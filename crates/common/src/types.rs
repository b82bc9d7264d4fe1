use serde::{Deserialize, Serialize};

/// Declares an `i64` newtype for a backend-assigned entity id.
///
/// Wrapping the raw number prevents mixing up, say, a cart item id with a
/// product id at a call site that takes both.
macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an id from the raw value assigned by the backend.
            pub fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw numeric value.
            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a registered user (customer or admin).
    UserId
);

entity_id!(
    /// Unique identifier for a catalog product.
    ProductId
);

entity_id!(
    /// Unique identifier for one line in a user's cart.
    ///
    /// Assigned by the backend when the product is first added; the client
    /// never synthesizes one.
    CartItemId
);

entity_id!(
    /// Unique identifier for a placed order.
    OrderId
);

entity_id!(
    /// Unique identifier for a saved shipping address.
    AddressId
);
