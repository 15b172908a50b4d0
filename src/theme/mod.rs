//! Theme preference - light or dark color scheme, persisted in a cookie

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of the cookie holding the preference
pub const THEME_COOKIE: &str = "theme";

/// One year, in seconds
const COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Color scheme applied to the root element of every page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    /// The other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Find the theme in a `Cookie` request header value.
    /// Returns `None` when the cookie is absent or holds an unknown value.
    pub fn from_cookie_header(header: &str) -> Option<Self> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == THEME_COOKIE)
            .and_then(|(_, value)| value.trim_matches('"').parse().ok())
    }

    /// `Set-Cookie` header value persisting this theme
    pub fn to_set_cookie(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; SameSite=Lax",
            THEME_COOKIE,
            self.as_str(),
            COOKIE_MAX_AGE
        )
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognized theme name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_toggled() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_from_cookie_header() {
        assert_eq!(Theme::from_cookie_header("theme=dark"), Some(Theme::Dark));
        assert_eq!(
            Theme::from_cookie_header("session=abc; theme=light; other=1"),
            Some(Theme::Light)
        );
        assert_eq!(Theme::from_cookie_header("session=abc"), None);
        assert_eq!(Theme::from_cookie_header("theme=neon"), None);
        assert_eq!(Theme::from_cookie_header("mytheme=dark"), None);
    }

    #[test]
    fn test_set_cookie() {
        let cookie = Theme::Dark.to_set_cookie();
        assert!(cookie.starts_with("theme=dark;"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=31536000"));
    }
}
