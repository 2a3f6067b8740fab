//! Matrix client creation: first login or session restoration.

use anyhow::{Context, Result};
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::SessionStore};

const DEVICE_DISPLAY_NAME: &str = "ranker bot";

/// Returns a logged-in client, restoring the stored session when there is one.
pub async fn connect(credentials: &UserCredentials, store: &SessionStore) -> Result<Client> {
    info!("setting up matrix client for user {}", credentials.user_id);

    match store.user_session() {
        Some(user_session) => {
            info!("restoring matrix session from disk");
            let client = build_client(credentials, store).await?;
            client.restore_session(user_session.clone()).await?;
            Ok(client)
        }
        None => login(credentials, store).await,
    }
}

async fn login(credentials: &UserCredentials, store: &SessionStore) -> Result<Client> {
    let client = build_client(credentials, store).await?;

    client
        .matrix_auth()
        .login_username(&credentials.user_id, &credentials.password)
        .initial_device_display_name(DEVICE_DISPLAY_NAME)
        .send()
        .await?;
    debug!("logged in as {}", credentials.user_id);

    let user_session = client
        .matrix_auth()
        .session()
        .context("no matrix session after login")?;
    store.save_user_session(&user_session).await?;

    info!("matrix login complete");
    Ok(client)
}

async fn build_client(credentials: &UserCredentials, store: &SessionStore) -> Result<Client> {
    let user_id: OwnedUserId = credentials
        .user_id
        .clone()
        .try_into()
        .with_context(|| format!("invalid matrix user id {}", credentials.user_id))?;

    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(store.sqlite_path(), credentials.passphrase.as_deref())
        .build()
        .await?;
    debug!("matrix client created");

    Ok(client)
}
