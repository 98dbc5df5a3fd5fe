//! Client location table.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::Role;

/// A navigation target known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard(Role),
    CreateAppointment,
    MyAppointments,
    NotFound,
}

/// Outcome of resolving a raw path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    /// The path names a route directly.
    Route(Route),
    /// The path is a retired alias for another route.
    Alias(Route),
}

impl Resolved {
    pub fn route(&self) -> Route {
        match self {
            Resolved::Route(route) | Resolved::Alias(route) => *route,
        }
    }
}

static ROUTES: Lazy<HashMap<&'static str, Route>> = Lazy::new(|| {
    HashMap::from([
        ("/", Route::Home),
        ("/login", Route::Login),
        ("/register", Route::Register),
        ("/dashboard/patient", Route::Dashboard(Role::Patient)),
        ("/dashboard/doctor", Route::Dashboard(Role::Doctor)),
        ("/dashboard/admin", Route::Dashboard(Role::Admin)),
        ("/dashboard/patient/create-appointment", Route::CreateAppointment),
        ("/dashboard/patient/appointments", Route::MyAppointments),
    ])
});

static LEGACY_ALIASES: Lazy<HashMap<&'static str, Route>> = Lazy::new(|| {
    HashMap::from([
        ("/patient-dashboard", Route::Dashboard(Role::Patient)),
        ("/doctor-dashboard", Route::Dashboard(Role::Doctor)),
        ("/admin-dashboard", Route::Dashboard(Role::Admin)),
    ])
});

impl Route {
    /// Resolves a raw location (query string and fragment ignored).
    pub fn resolve(path: &str) -> Resolved {
        let path = normalize(path);
        if let Some(route) = ROUTES.get(path.as_str()) {
            return Resolved::Route(*route);
        }
        if let Some(route) = LEGACY_ALIASES.get(path.as_str()) {
            return Resolved::Alias(*route);
        }
        Resolved::Route(Route::NotFound)
    }

    /// Canonical path for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard(role) => role.home_path(),
            Route::CreateAppointment => "/dashboard/patient/create-appointment",
            Route::MyAppointments => "/dashboard/patient/appointments",
            Route::NotFound => "/404",
        }
    }

    /// Whether the route is behind the guard at all.
    pub fn requires_auth(&self) -> bool {
        self.allowed_roles().is_some()
    }

    /// Roles allowed to render the route; `None` for public routes.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Dashboard(Role::Patient) | Route::CreateAppointment | Route::MyAppointments => {
                Some(&[Role::Patient])
            }
            Route::Dashboard(Role::Doctor) => Some(&[Role::Doctor]),
            Route::Dashboard(Role::Admin) => Some(&[Role::Admin]),
            Route::Home | Route::Login | Route::Register | Route::NotFound => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
