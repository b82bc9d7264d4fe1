//! Authenticated session context.

use common::UserId;
use uuid::Uuid;

/// The authenticated identity scoping all remote calls for a user session.
///
/// Constructed exactly once from a successful login and threaded explicitly
/// into every collaborator call; domain logic never reads ambient storage.
/// The token is normalised here and nowhere else: any `"Bearer "` prefix the
/// backend happens to include is stripped on construction, and the prefix is
/// re-added in exactly one place, [`SessionContext::authorization_value`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    user_id: UserId,
    token: String,
    visitor_session: Uuid,
}

impl SessionContext {
    /// Creates a session from a login response.
    ///
    /// `raw_token` may or may not carry a `"Bearer "` prefix; both forms
    /// produce the same session.
    pub fn new(user_id: UserId, raw_token: impl Into<String>) -> Self {
        let raw = raw_token.into();
        let token = raw
            .trim()
            .strip_prefix("Bearer ")
            .unwrap_or(raw.trim())
            .to_string();

        Self {
            user_id,
            token,
            visitor_session: Uuid::new_v4(),
        }
    }

    /// Returns the user this session belongs to.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the `Authorization` header value for outgoing requests.
    ///
    /// This is the single place the bearer prefix is applied.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Returns the client-generated visitor session id used by the sales
    /// collaborator's visitor tracking.
    pub fn visitor_session(&self) -> Uuid {
        self.visitor_session
    }
}
