//! Authentication-related logic.

use crate::{
    dal::Store,
    schema::{Credentials, Player},
};
use failure::Fallible;
use log::{info, warn};
use serde_derive::Serialize;
use uuid::Uuid;

/// A logged-in player.
#[derive(Clone, Debug, Serialize)]
pub struct Session {
    /// The player.
    pub player: Player,

    /// The credentials they logged in with.
    #[serde(skip)]
    pub credentials: Credentials,
}

/// Returns the session for the given token, if any.
pub async fn authed_user(store: &dyn Store, token: &str) -> Fallible<Session> {
    let token = token.parse::<Uuid>()?;
    let player = store.get_auth_user(token).await?;
    Ok(Session {
        player,
        credentials: Credentials {
            authorization_token: token,
        },
    })
}

/// Logs in the player with the given email address and passcode, returning a new authentication
/// token.
pub async fn login(store: &dyn Store, email: &str, passcode: &str) -> Fallible<Uuid> {
    let email = email.trim().to_owned();
    let player = match store.check_login(email.clone(), passcode.to_owned()).await {
        Ok(player) => player,
        Err(err) => {
            warn!("Failed login for {}: {}", email, err);
            return Err(err);
        }
    };
    let token = store.create_auth(player.user_id.clone()).await?;
    info!("{} logged in", player.user_id);
    Ok(token)
}
