//! Session/auth gate - credential checks and session slots.
//!
//! Credentials are matched in clear text against the user collection. A
//! successful login stamps `last_login`, persists it, and stores a full copy
//! of the user as the session. The session copy is a snapshot: later edits to
//! the user are not reflected until the next login or restore.

use crate::{
    core::timestamp_now,
    errors::{Error, Result},
    models::User,
    storage::{DocumentStore, RememberToken},
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Validates credentials and opens a session.
///
/// # Arguments
/// * `username` / `password` - compared exactly, in clear text
/// * `remember` - also mint a remember-me token bound to this user
///
/// # Errors
/// * [`Error::InvalidCredentials`] when no user matches
/// * [`Error::AccountDisabled`] when the matching user is inactive
#[instrument(skip(store, password))]
pub async fn login(
    store: &DocumentStore,
    username: &str,
    password: &str,
    remember: bool,
) -> Result<User> {
    let mut user = store
        .get_users()
        .await?
        .into_iter()
        .find(|u| u.username == username && u.password == password)
        .ok_or(Error::InvalidCredentials)?;

    if !user.is_active {
        warn!("Login refused for disabled account '{username}'");
        return Err(Error::AccountDisabled {
            username: user.username,
        });
    }

    let now = timestamp_now();
    user.last_login = now;
    store.save_user(user.clone()).await?;
    store.set_session(&user).await?;

    if remember {
        let token = RememberToken {
            token: Uuid::new_v4().to_string(),
            user_id: Some(user.id.clone()),
            issued_at: Some(now),
        };
        store.set_remember_token(&token).await?;
    }

    info!("User '{}' logged in as {}", user.username, user.role);
    Ok(user)
}

/// Clears the session and the remember-me token, whatever their state.
#[instrument(skip(store))]
pub async fn logout(store: &DocumentStore) -> Result<()> {
    store.clear_session().await?;
    info!("Session cleared");
    Ok(())
}

/// The live session user, if any. Does not consult the remember-me token.
pub async fn current_user(store: &DocumentStore) -> Result<Option<User>> {
    store.get_session().await
}

/// Start-up session resolution.
///
/// A live session is trusted as-is. Otherwise a remember-me token is resolved
/// to its user (legacy tokens without a user id are looked up as a literal
/// user id) and, if that user still exists and is active, the session is
/// restored. A token that resolves to nobody is discarded, and so is a
/// session slot that no longer parses.
#[instrument(skip(store))]
pub async fn restore_session(store: &DocumentStore) -> Result<Option<User>> {
    match store.get_session().await {
        Ok(Some(user)) => return Ok(Some(user)),
        Ok(None) => {}
        Err(e @ Error::CorruptDocument { .. }) => {
            warn!("Discarding unreadable session: {e}");
            store.clear_session().await?;
            return Ok(None);
        }
        Err(e) => return Err(e),
    }

    let Some(token) = store.get_remember_token().await? else {
        return Ok(None);
    };

    let lookup_id = token.user_id.as_deref().unwrap_or(&token.token);
    match store.get_user_by_id(lookup_id).await? {
        Some(user) if user.is_active => {
            store.set_session(&user).await?;
            info!("Restored session for '{}' from remember token", user.username);
            Ok(Some(user))
        }
        Some(user) => {
            warn!("Remember token belongs to disabled account '{}'", user.username);
            store.clear_session().await?;
            Ok(None)
        }
        None => {
            warn!("Remember token does not resolve to a user, discarding it");
            store.clear_session().await?;
            Ok(None)
        }
    }
}
