use std::str::FromStr;
use web_sys::RequestCredentials;

pub const SESSION_PATH: &str = "/auth/me";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const PROCESS_PATH: &str = "/api/process";

const DEFAULT_WATCH_WINDOW_MS: u32 = 8_000;

const META_API_BASE: &str = "notes-api-base";
const META_REQUIRE_LOGIN: &str = "notes-require-login";
const META_WATCH_WINDOW: &str = "notes-watch-window-ms";

/// Runtime settings, read from `<meta name=... content=...>` tags in the host page.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base: String,
    pub require_login: bool,
    pub watch_window_ms: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            require_login: true,
            watch_window_ms: DEFAULT_WATCH_WINDOW_MS,
        }
    }
}

impl AppConfig {
    pub fn from_document() -> Self {
        let document = web_sys::window().and_then(|window| window.document());
        Self::from_lookup(|name| {
            document
                .as_ref()?
                .query_selector(&format!("meta[name=\"{}\"]", name))
                .ok()
                .flatten()?
                .get_attribute("content")
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base = lookup(META_API_BASE)
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base);

        let require_login = lookup(META_REQUIRE_LOGIN)
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(defaults.require_login);

        let watch_window_ms = parse_setting(lookup(META_WATCH_WINDOW), META_WATCH_WINDOW)
            .unwrap_or(defaults.watch_window_ms);

        Self { api_base, require_login, watch_window_ms }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// An absolute base may name another origin.
    pub fn is_cross_origin(&self) -> bool {
        let base = self.api_base.to_ascii_lowercase();
        base.starts_with("http://") || base.starts_with("https://") || base.starts_with("//")
    }

    /// Cookie mode for API requests. The session cookie has to be sent
    /// explicitly once the API lives elsewhere.
    pub fn credentials(&self) -> RequestCredentials {
        if self.is_cross_origin() {
            RequestCredentials::Include
        } else {
            RequestCredentials::SameOrigin
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            log::warn!("Ignoring unrecognised {} value: {:?}", META_REQUIRE_LOGIN, other);
            None
        }
    }
}

fn parse_setting<T: FromStr>(raw: Option<String>, name: &str) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring unparseable {} value: {:?}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn missing_meta_uses_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert!(config.require_login);
        assert_eq!(config.watch_window_ms, 8_000);
        assert_eq!(config.endpoint(PROCESS_PATH), "/api/process");
        assert_eq!(config.credentials(), RequestCredentials::SameOrigin);
    }

    #[test]
    fn absolute_api_base_sends_cookies() {
        let config = config_from(&[("notes-api-base", "https://api.example.com")]);
        assert!(config.is_cross_origin());
        assert_eq!(config.credentials(), RequestCredentials::Include);

        let config = config_from(&[("notes-api-base", "//api.example.com")]);
        assert_eq!(config.credentials(), RequestCredentials::Include);

        let config = config_from(&[("notes-api-base", "/notes")]);
        assert!(!config.is_cross_origin());
        assert_eq!(config.credentials(), RequestCredentials::SameOrigin);
    }

    #[test]
    fn meta_values_override_defaults() {
        let config = config_from(&[
            ("notes-api-base", "https://notes.example.com/"),
            ("notes-require-login", "0"),
            ("notes-watch-window-ms", "2500"),
        ]);
        assert_eq!(config.endpoint(SESSION_PATH), "https://notes.example.com/auth/me");
        assert!(!config.require_login);
        assert_eq!(config.watch_window_ms, 2_500);
    }

    #[test]
    fn garbage_values_fall_back() {
        let config = config_from(&[
            ("notes-require-login", "maybe"),
            ("notes-watch-window-ms", "soon"),
        ]);
        assert!(config.require_login);
        assert_eq!(config.watch_window_ms, 8_000);
    }
}
