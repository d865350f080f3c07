//! Authorization gate helpers shared by protected handlers.
//!
//! Session restoration re-resolves the user from the store on every
//! protected request: a session whose account has vanished is purged and
//! treated as anonymous, exactly as if no cookie had been presented.

use crate::domain::{Error, User};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Resolve the authenticated user behind the current session.
///
/// Returns `Unauthorized` when the session is anonymous or its user no
/// longer exists; the stale session is destroyed in the latter case.
pub async fn require_user(
    session: &SessionContext,
    state: &HttpState,
) -> Result<User, Error> {
    let user_id = session.require_user_id()?;
    match state.profile.fetch(&user_id).await? {
        Some(user) => Ok(user),
        None => {
            tracing::warn!(user_id = %user_id, "session references a missing user");
            session.purge();
            Err(Error::unauthorized("login required"))
        }
    }
}
