//! Static application identity.
//!
//! Names used for on-disk locations and the OAuth scope requested from
//! Google. This is a compile-time constant and never changes at runtime.

/// Identity of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppInfo {
    /// Directory name used under the user's config and cache directories.
    pub name: &'static str,
    /// Publisher name.
    pub author: &'static str,
    /// OAuth scopes requested from Google. Changing them invalidates
    /// stored tokens.
    pub scopes: &'static [&'static str],
}

impl AppInfo {
    /// Returns the scopes as owned strings.
    pub fn scope_list(&self) -> Vec<String> {
        self.scopes.iter().map(|s| s.to_string()).collect()
    }
}

/// Read-only access to the user's calendars.
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// The application identity.
pub const APP: AppInfo = AppInfo {
    name: "xbar-google-calendar",
    author: "pdp7",
    scopes: &[CALENDAR_READONLY_SCOPE],
};
