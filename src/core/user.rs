//! User administration - registration, activation, vehicles and favorites.

use crate::{
    core::{station, timestamp_now},
    errors::{Error, Result},
    models::{Role, User, UserPreferences, UserProfile, Vehicle},
    storage::DocumentStore,
};
use tracing::{info, instrument};
use uuid::Uuid;

/// The user with `user_id`.
///
/// # Errors
/// [`Error::UserNotFound`] if it does not exist.
pub async fn get_user(store: &DocumentStore, user_id: &str) -> Result<User> {
    store
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            id: user_id.to_string(),
        })
}

/// Details for a new account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Login name, unique across users
    pub username: String,
    /// Clear-text password
    pub password: String,
    /// Access role
    pub role: Role,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// Creates an active account with default preferences and no vehicles.
///
/// # Errors
/// [`Error::DuplicateUsername`] if the username is taken.
#[instrument(skip(store, new), fields(username = %new.username))]
pub async fn register_user(store: &DocumentStore, new: NewUser) -> Result<User> {
    if store
        .get_users()
        .await?
        .iter()
        .any(|u| u.username == new.username)
    {
        return Err(Error::DuplicateUsername {
            username: new.username,
        });
    }

    let now = timestamp_now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        username: new.username,
        password: new.password,
        role: new.role,
        profile: UserProfile {
            full_name: new.full_name,
            email: new.email,
            phone: new.phone,
            vehicles: Vec::new(),
            preferences: UserPreferences::default(),
        },
        favorites: Vec::new(),
        created_at: now,
        last_login: now,
        is_active: true,
    };
    store.save_user(user.clone()).await?;
    info!("Registered '{}' as {}", user.username, user.role);
    Ok(user)
}

/// Enables or disables an account. A disabled user cannot log in.
#[instrument(skip(store))]
pub async fn set_user_active(store: &DocumentStore, user_id: &str, active: bool) -> Result<User> {
    let mut user = get_user(store, user_id).await?;
    user.is_active = active;
    store.save_user(user.clone()).await?;
    Ok(user)
}

/// Adds a vehicle to the user's profile, assigning it a fresh id.
pub async fn add_vehicle(store: &DocumentStore, user_id: &str, vehicle: Vehicle) -> Result<User> {
    let mut user = get_user(store, user_id).await?;
    user.profile.vehicles.push(Vehicle {
        id: Uuid::new_v4().to_string(),
        ..vehicle
    });
    store.save_user(user.clone()).await?;
    Ok(user)
}

/// Adds `station_id` to the user's favorites, or removes it if already there.
///
/// Returns whether the station is a favorite afterwards.
pub async fn toggle_favorite(
    store: &DocumentStore,
    user_id: &str,
    station_id: i64,
) -> Result<bool> {
    let mut user = get_user(store, user_id).await?;
    station::get_station(store, station_id).await?;

    let favorite = if let Some(pos) = user.favorites.iter().position(|id| *id == station_id) {
        user.favorites.remove(pos);
        false
    } else {
        user.favorites.push(station_id);
        true
    };
    store.save_user(user).await?;
    Ok(favorite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FuelType;
    use crate::test_utils::{sample_station, sample_user, sample_vehicle};

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "pw".to_string(),
            role: Role::Customer,
            full_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            phone: "+91 9000000001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_user() -> Result<()> {
        let store = DocumentStore::in_memory();
        let user = register_user(&store, new_user("neha")).await?;

        assert!(user.is_active);
        assert!(user.profile.vehicles.is_empty());
        assert_eq!(get_user(&store, &user.id).await?, user);
        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_username() -> Result<()> {
        let store = DocumentStore::in_memory();
        register_user(&store, new_user("neha")).await?;

        assert!(matches!(
            register_user(&store, new_user("neha")).await,
            Err(Error::DuplicateUsername { .. })
        ));
        assert_eq!(store.get_users().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_user_active() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_user(sample_user("u1", "priya", "pw")).await?;

        let user = set_user_active(&store, "u1", false).await?;
        assert!(!user.is_active);
        assert!(!get_user(&store, "u1").await?.is_active);

        assert!(matches!(
            set_user_active(&store, "ghost", true).await,
            Err(Error::UserNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_vehicle_assigns_id() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_user(sample_user("u1", "priya", "pw")).await?;

        let user = add_vehicle(&store, "u1", sample_vehicle("ignored", FuelType::Cng)).await?;
        assert_eq!(user.profile.vehicles.len(), 2);
        let added = &user.profile.vehicles[1];
        assert_ne!(added.id, "ignored");
        assert_eq!(added.fuel_type, FuelType::Cng);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_favorite() -> Result<()> {
        let store = DocumentStore::in_memory();
        store.save_user(sample_user("u1", "priya", "pw")).await?;
        store.save_station(sample_station(3, 100.0)).await?;

        assert!(toggle_favorite(&store, "u1", 3).await?);
        assert_eq!(get_user(&store, "u1").await?.favorites, vec![3]);
        assert!(!toggle_favorite(&store, "u1", 3).await?);
        assert!(get_user(&store, "u1").await?.favorites.is_empty());

        assert!(matches!(
            toggle_favorite(&store, "u1", 99).await,
            Err(Error::StationNotFound { id: 99 })
        ));
        Ok(())
    }
}
