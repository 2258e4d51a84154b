//! Caller identity, passed explicitly into mutations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is performing an operation.
///
/// Handed to every mutation as an explicit value instead of read from
/// ambient session state, so the service stays testable without a simulated
/// login. The scheduler records it on the operation's tracing span; role
/// enforcement itself belongs to the calling application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Uuid,
    /// Role label as the calling application defines it (e.g. "admin").
    pub role: String,
}

impl AuthContext {
    pub fn new(user_id: Uuid, role: &str) -> Self {
        AuthContext {
            user_id,
            role: role.to_string(),
        }
    }
}
