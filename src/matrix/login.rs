//! Matrix client creation.
//!
//! The first start logs in with the password and saves the session; later starts
//! restore the saved session from disk. Both paths share the same encrypted SQLite
//! store, so the SDK state survives restarts.

use anyhow::Context;
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::SessionStore};

/// Returns a logged-in client, restoring the saved session when there is one.
///
/// # Errors
///
/// Fails when the user ID is invalid, the homeserver cannot be reached, the
/// credentials are rejected, or the session cannot be saved.
pub async fn connect(
    user_credentials: &UserCredentials,
    store: &SessionStore,
) -> Result<Client, anyhow::Error> {
    let user_id: OwnedUserId = user_credentials
        .user_id
        .as_str()
        .try_into()
        .with_context(|| format!("invalid user id {}", user_credentials.user_id))?;

    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), Some(&user_credentials.passphrase))
        .build()
        .await?;
    debug!("matrix client created");

    match store.user_session() {
        Some(user_session) => {
            info!("restoring matrix session from disk");
            client.restore_session(user_session.clone()).await?;
        }
        None => {
            info!("logging in as {}", user_id);
            client
                .matrix_auth()
                .login_username(&user_id, &user_credentials.password)
                .initial_device_display_name("sorteio bot")
                .send()
                .await?;

            let user_session = client
                .matrix_auth()
                .session()
                .context("no session after login")?;
            store.save_user_session(&user_session).await?;
        }
    }

    info!("matrix client ready");
    Ok(client)
}
