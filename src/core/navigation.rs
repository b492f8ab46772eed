//! Role-gated navigation.
//!
//! Each role owns a fixed set of views. A guarded entry point sends visitors
//! without a session to login and sessions of the wrong role to the
//! unauthorized page.

use crate::models::{Role, User};
use std::fmt;

/// A screen of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Role landing page
    Overview,
    /// User management (admin)
    Users,
    /// Station management (admin)
    Stations,
    /// Request monitoring (admin)
    Requests,
    /// Request analytics (admin)
    Analytics,
    /// System health (admin)
    System,
    /// New fuel request form (customer)
    RequestFuel,
    /// Own request history (customer)
    MyRequests,
}

const ADMIN_VIEWS: &[View] = &[
    View::Overview,
    View::Users,
    View::Stations,
    View::Requests,
    View::Analytics,
    View::System,
];
const CUSTOMER_VIEWS: &[View] = &[View::Overview, View::RequestFuel, View::MyRequests];
const STATION_VIEWS: &[View] = &[View::Overview];

impl View {
    /// Path segment under the dashboard; empty for the overview.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Overview => "",
            Self::Users => "users",
            Self::Stations => "stations",
            Self::Requests => "requests",
            Self::Analytics => "analytics",
            Self::System => "system",
            Self::RequestFuel => "request",
            Self::MyRequests => "my-requests",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Dashboard",
            Self::Users => "Users",
            Self::Stations => "Stations",
            Self::Requests => "Requests",
            Self::Analytics => "Analytics",
            Self::System => "System Health",
            Self::RequestFuel => "Request Fuel",
            Self::MyRequests => "My Requests",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The views `role` may open, overview first.
#[must_use]
pub const fn views_for(role: Role) -> &'static [View] {
    match role {
        Role::Admin => ADMIN_VIEWS,
        Role::Customer => CUSTOMER_VIEWS,
        Role::StationOperator => STATION_VIEWS,
    }
}

/// Where a guarded entry point leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// No session
    Login,
    /// Session role not among the allowed roles
    Unauthorized,
    /// Access granted; carries the session role's views
    Dashboard(&'static [View]),
}

/// Resolves a guarded entry point for `session`.
///
/// An empty `allowed_roles` admits any authenticated user.
#[must_use]
pub fn resolve_route(session: Option<&User>, allowed_roles: &[Role]) -> Route {
    match session {
        None => Route::Login,
        Some(user) if !allowed_roles.is_empty() && !allowed_roles.contains(&user.role) => {
            Route::Unauthorized
        }
        Some(user) => Route::Dashboard(views_for(user.role)),
    }
}

/// The view `path` names for `role`, falling back to the overview for
/// unknown paths and paths outside the role's set.
#[must_use]
pub fn resolve_view(role: Role, path: &str) -> View {
    let path = path.trim_matches('/');
    views_for(role)
        .iter()
        .copied()
        .find(|view| view.path() == path)
        .unwrap_or(View::Overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::user_with_role;

    #[test]
    fn test_views_per_role() {
        assert_eq!(views_for(Role::Admin).len(), 6);
        assert_eq!(
            views_for(Role::Customer),
            &[View::Overview, View::RequestFuel, View::MyRequests]
        );
        assert_eq!(views_for(Role::StationOperator), &[View::Overview]);
        for role in [Role::Admin, Role::Customer, Role::StationOperator] {
            assert_eq!(views_for(role)[0], View::Overview);
        }
    }

    #[test]
    fn test_resolve_route() {
        let admin = user_with_role("a", "admin", Role::Admin, true);
        let customer = user_with_role("c", "user", Role::Customer, true);

        assert_eq!(resolve_route(None, &[]), Route::Login);
        assert_eq!(resolve_route(None, &[Role::Admin]), Route::Login);
        assert_eq!(
            resolve_route(Some(&customer), &[Role::Admin]),
            Route::Unauthorized
        );
        assert_eq!(
            resolve_route(Some(&admin), &[Role::Admin]),
            Route::Dashboard(views_for(Role::Admin))
        );
        assert_eq!(
            resolve_route(Some(&customer), &[]),
            Route::Dashboard(views_for(Role::Customer))
        );
    }

    #[test]
    fn test_resolve_view_falls_back_to_overview() {
        assert_eq!(resolve_view(Role::Admin, "/analytics"), View::Analytics);
        assert_eq!(resolve_view(Role::Customer, "my-requests"), View::MyRequests);
        assert_eq!(resolve_view(Role::Customer, "analytics"), View::Overview);
        assert_eq!(resolve_view(Role::StationOperator, "nowhere"), View::Overview);
    }
}
