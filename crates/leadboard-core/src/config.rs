use std::time::Duration;

use chrono_tz::Tz;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Base URL of the managed database; PostgREST is served under `/rest/v1`.
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub auth_mode: AuthMode,
    /// HMAC secret for session tokens. `None` means a random secret is
    /// generated at startup (sessions do not survive a restart).
    pub session_secret: Option<String>,
    pub session_minutes: u32,
    pub https: bool,
    pub cors_origins: Vec<String>,
    pub rpc_timeout_secs: u64,
    pub timezone: Tz,
    pub login_path: String,
    pub clients_table: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthMode {
    None,
    /// Single operator account checked against configured credentials.
    Password { username: String, password: String },
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require =
            |key: &str| var(key).ok_or_else(|| format!("{key} is required"));

        Ok(Self {
            port: var("LEADBOARD_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            supabase_url: require("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_service_key: require("SUPABASE_SERVICE_ROLE_KEY")?,
            auth_mode: {
                let raw = var("LEADBOARD_AUTH").unwrap_or_else(|| "password".to_string());
                match raw.as_str() {
                    "none" => AuthMode::None,
                    "password" => AuthMode::Password {
                        username: var("LEADBOARD_ADMIN_USER").unwrap_or_else(|| "admin".to_string()),
                        password: var("LEADBOARD_ADMIN_PASSWORD").ok_or_else(|| {
                            "LEADBOARD_ADMIN_PASSWORD required when LEADBOARD_AUTH=password"
                                .to_string()
                        })?,
                    },
                    other => return Err(format!("invalid LEADBOARD_AUTH: {other}")),
                }
            },
            session_secret: var("LEADBOARD_SESSION_SECRET"),
            session_minutes: var("LEADBOARD_SESSION_MINUTES")
                .and_then(|v| v.parse().ok())
                .filter(|m| *m > 0)
                .unwrap_or(60),
            // Only an explicit opt-out drops `Secure` from the session cookie.
            https: var("LEADBOARD_HTTPS")
                .map(|v| {
                    !matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "false" | "0" | "no" | "off"
                    )
                })
                .unwrap_or(true),
            cors_origins: var("LEADBOARD_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            rpc_timeout_secs: var("LEADBOARD_RPC_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            timezone: match var("LEADBOARD_TIMEZONE") {
                Some(raw) => raw
                    .parse::<Tz>()
                    .map_err(|_| format!("invalid LEADBOARD_TIMEZONE: {raw}"))?,
                None => Tz::UTC,
            },
            login_path: var("LEADBOARD_LOGIN_PATH").unwrap_or_else(|| "/lock-screen".to_string()),
            clients_table: var("LEADBOARD_CLIENTS_TABLE")
                .unwrap_or_else(|| "clients_ffs".to_string()),
        })
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn session_duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.session_minutes) * 60)
    }

    /// Calendar date "now" in the reporting timezone.
    pub fn today(&self) -> chrono::NaiveDate {
        chrono::Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("SUPABASE_URL", "https://db.example.supabase.co/"),
        ("SUPABASE_SERVICE_ROLE_KEY", "service-key"),
        ("LEADBOARD_ADMIN_PASSWORD", "hunter2"),
    ];

    #[test]
    fn defaults_apply() {
        let cfg = Config::from_lookup(lookup(BASE)).expect("config");
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.supabase_url, "https://db.example.supabase.co");
        assert_eq!(
            cfg.auth_mode,
            AuthMode::Password {
                username: "admin".to_string(),
                password: "hunter2".to_string()
            }
        );
        assert_eq!(cfg.session_minutes, 60);
        assert!(cfg.https);
        assert!(cfg.cors_origins.is_empty());
        assert_eq!(cfg.timezone, Tz::UTC);
        assert_eq!(cfg.login_path, "/lock-screen");
        assert_eq!(cfg.clients_table, "clients_ffs");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = Config::from_lookup(lookup(&[("SUPABASE_SERVICE_ROLE_KEY", "k")]))
            .expect_err("must fail");
        assert_eq!(err, "SUPABASE_URL is required");
    }

    #[test]
    fn password_mode_requires_password() {
        let err = Config::from_lookup(lookup(&BASE[..2])).expect_err("must fail");
        assert!(err.contains("LEADBOARD_ADMIN_PASSWORD"));
    }

    #[test]
    fn auth_none_needs_no_credentials() {
        let mut pairs = BASE[..2].to_vec();
        pairs.push(("LEADBOARD_AUTH", "none"));
        let cfg = Config::from_lookup(lookup(&pairs)).expect("config");
        assert_eq!(cfg.auth_mode, AuthMode::None);
    }

    #[test]
    fn parses_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.extend([
            ("LEADBOARD_PORT", "8080"),
            ("LEADBOARD_CORS_ORIGINS", "https://a.example, https://b.example"),
            ("LEADBOARD_TIMEZONE", "America/Los_Angeles"),
            ("LEADBOARD_HTTPS", "false"),
            ("LEADBOARD_SESSION_MINUTES", "15"),
        ]);
        let cfg = Config::from_lookup(lookup(&pairs)).expect("config");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(cfg.timezone, chrono_tz::America::Los_Angeles);
        assert!(!cfg.https);
        assert_eq!(cfg.session_duration(), Duration::from_secs(900));
    }

    #[test]
    fn https_stays_on_unless_explicitly_disabled() {
        for (raw, expected) in [
            ("TRUE", true),
            ("1", true),
            ("yes", true),
            ("False", false),
            ("0", false),
        ] {
            let mut pairs = BASE.to_vec();
            pairs.push(("LEADBOARD_HTTPS", raw));
            let cfg = Config::from_lookup(lookup(&pairs)).expect("config");
            assert_eq!(cfg.https, expected, "LEADBOARD_HTTPS={raw}");
        }
    }

    #[test]
    fn rejects_unknown_timezone_and_auth_mode() {
        let mut pairs = BASE.to_vec();
        pairs.push(("LEADBOARD_TIMEZONE", "Mars/Olympus"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut pairs = BASE.to_vec();
        pairs.push(("LEADBOARD_AUTH", "oauth"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
