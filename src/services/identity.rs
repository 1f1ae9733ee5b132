use crate::{errors::AppResult, models::domain::User, repositories::UserRepository};

/// Who a submission's points belong to.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIdentity {
    Registered(User),
    Guest,
}

impl ResolvedIdentity {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            ResolvedIdentity::Registered(user) => Some(&user.id),
            ResolvedIdentity::Guest => None,
        }
    }
}

/// Resolves the participant in priority order:
///
/// 1. A supplied e-mail decides alone. A matching user wins over any caller-supplied id;
///    no match makes the participant a guest even if an id was supplied.
/// 2. Without an e-mail, a caller-supplied id that names an existing user.
/// 3. Otherwise a guest.
pub async fn resolve_identity(
    users: &dyn UserRepository,
    email: Option<&str>,
    user_id: Option<&str>,
) -> AppResult<ResolvedIdentity> {
    if let Some(email) = email {
        let resolved = match users.find_by_email(email).await? {
            Some(user) => ResolvedIdentity::Registered(user),
            None => ResolvedIdentity::Guest,
        };
        return Ok(resolved);
    }

    if let Some(user_id) = user_id {
        if let Some(user) = users.find_by_id(user_id).await? {
            return Ok(ResolvedIdentity::Registered(user));
        }
    }

    Ok(ResolvedIdentity::Guest)
}
