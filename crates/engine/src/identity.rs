use uuid::Uuid;

/// The authenticated caller, as resolved from a session token.
///
/// Every scoped operation takes it explicitly.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}
