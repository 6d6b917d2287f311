//! Client route table and the authentication guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Public routes are `/`, `/login` and `/register`. Everything else needs a
//! session identity and redirects to `/login` without one. A logged-in user
//! landing on `/` or `/login` is sent to `/feed`; `/register` renders in
//! either state.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use std::fmt;

use crate::session::SessionContext;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Feed,
    /// `/profile` for the session user, `/profile/:username` for anyone.
    Profile(Option<String>),
    Edit,
    /// `/messages` or `/messages/:conversationId`.
    Messages(Option<String>),
    Connections(Option<String>),
    University,
    FacultyDirectory,
    AcademicCalendar,
    Events,
    News,
}

impl Route {
    /// Match a path against the route table. Query strings, fragments and a
    /// trailing slash are ignored. Returns `None` for unknown paths.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Self::Root,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["feed"] => Self::Feed,
            ["profile"] => Self::Profile(None),
            ["profile", user] => Self::Profile(Some((*user).to_owned())),
            ["edit"] => Self::Edit,
            ["messages"] => Self::Messages(None),
            ["messages", conversation] => Self::Messages(Some((*conversation).to_owned())),
            ["connections"] => Self::Connections(None),
            ["connections", user] => Self::Connections(Some((*user).to_owned())),
            ["university"] => Self::University,
            ["faculty-directory"] => Self::FacultyDirectory,
            ["academic-calendar"] => Self::AcademicCalendar,
            ["events"] => Self::Events,
            ["news"] => Self::News,
            _ => return None,
        };
        Some(route)
    }

    #[must_use]
    pub fn path(&self) -> String {
        let with_param = |base: &str, param: Option<&str>| match param {
            Some(p) => format!("{base}/{p}"),
            None => base.to_owned(),
        };
        match self {
            Self::Root => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Feed => "/feed".to_owned(),
            Self::Profile(user) => with_param("/profile", user.as_deref()),
            Self::Edit => "/edit".to_owned(),
            Self::Messages(conversation) => with_param("/messages", conversation.as_deref()),
            Self::Connections(user) => with_param("/connections", user.as_deref()),
            Self::University => "/university".to_owned(),
            Self::FacultyDirectory => "/faculty-directory".to_owned(),
            Self::AcademicCalendar => "/academic-calendar".to_owned(),
            Self::Events => "/events".to_owned(),
            Self::News => "/news".to_owned(),
        }
    }

    #[must_use]
    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Root | Self::Login | Self::Register)
    }

    /// Routes that send an already logged-in user to the feed.
    fn is_login_entry(&self) -> bool {
        matches!(self, Self::Root | Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// =============================================================================
// GUARD
// =============================================================================

/// Outcome of navigating to a path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    NotFound,
}

/// Apply the authentication guard to a known route.
#[must_use]
pub fn guard(route: Route, authenticated: bool) -> Navigation {
    if route.requires_session() && !authenticated {
        Navigation::Redirect(Route::Login)
    } else if route.is_login_entry() && authenticated {
        Navigation::Redirect(Route::Feed)
    } else {
        Navigation::Render(route)
    }
}

/// Resolve a path against the route table and the current session.
#[must_use]
pub fn resolve(path: &str, session: &SessionContext) -> Navigation {
    match Route::parse(path) {
        Some(route) => guard(route, session.is_authenticated()),
        None => Navigation::NotFound,
    }
}
