pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub weather_api_key: Option<String>,
    pub weather_api_url: String,
    pub mail_relay: Option<MailRelay>,
    pub upload_dir: String,
}

/// Credentials for the HTTP mail relay. All-or-none: a partial set is
/// treated as not configured.
#[derive(Clone)]
pub struct MailRelay {
    pub url: String,
    pub token: String,
    pub from: String,
    /// Recipient of contact-form alerts. Defaults to `from`.
    pub notify_to: String,
}

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const DEFAULT_UPLOAD_DIR: &str = "public/uploads";
const DEFAULT_PORT: u16 = 3000;

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!(
            "Could not get the environment variable `{key}` due to unicode error"
        )),
    }
}

/// Either all or none of the variables are set
fn all_or_none_vars(keys: &[&str]) -> Option<Vec<String>> {
    let vals: Vec<Option<String>> = keys
        .iter()
        .map(|k| var(k).ok().flatten().filter(|v| !v.is_empty()))
        .collect();

    if vals.iter().all(Option::is_some) {
        Some(vals.into_iter().flatten().collect())
    } else {
        if vals.iter().any(Option::is_some) {
            tracing::error!(
                "environment variables {keys:?} must be set together, ignoring the partial set"
            );
        }
        None
    }
}

fn nonempty_var(key: &str) -> Option<String> {
    var(key).ok().flatten().filter(|v| !v.is_empty())
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        let port = match nonempty_var("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                tracing::warn!("PORT `{p}` is not a valid port number, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let mail_relay = all_or_none_vars(&["MAIL_RELAY_URL", "MAIL_RELAY_TOKEN", "MAIL_FROM"])
            .map(|mut vars| {
                let url = vars.remove(0);
                let token = vars.remove(0);
                let from = vars.remove(0);
                let notify_to = nonempty_var("MAIL_NOTIFY_TO").unwrap_or_else(|| from.clone());
                MailRelay {
                    url,
                    token,
                    from,
                    notify_to,
                }
            });

        ServerConfig {
            port,
            database_url: nonempty_var("DATABASE_URL"),
            weather_api_key: nonempty_var("WEATHER_API_KEY"),
            weather_api_url: nonempty_var("WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            mail_relay,
            upload_dir: nonempty_var("UPLOAD_DIR").unwrap_or_else(|| DEFAULT_UPLOAD_DIR.to_string()),
        }
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        ServerConfig {
            port: 0,
            database_url: None,
            weather_api_key: None,
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            mail_relay: None,
            upload_dir: std::env::temp_dir()
                .join("web-test-uploads")
                .to_string_lossy()
                .into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that manipulate process environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "PORT",
        "DATABASE_URL",
        "WEATHER_API_KEY",
        "WEATHER_API_URL",
        "MAIL_RELAY_URL",
        "MAIL_RELAY_TOKEN",
        "MAIL_FROM",
        "MAIL_NOTIFY_TO",
        "UPLOAD_DIR",
    ];

    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: serialized by the mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: restoring the original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn port_defaults_when_unset_or_empty() {
        with_env_vars(&[], || {
            assert_eq!(ServerConfig::new_from_env().port, 3000);
        });
        with_env_vars(&[("PORT", "")], || {
            assert_eq!(ServerConfig::new_from_env().port, 3000);
        });
    }

    #[test]
    fn port_parses_when_set() {
        with_env_vars(&[("PORT", "8080")], || {
            assert_eq!(ServerConfig::new_from_env().port, 8080);
        });
    }

    #[test]
    fn mail_relay_requires_all_variables() {
        with_env_vars(&[("MAIL_RELAY_URL", "https://relay.test/send")], || {
            assert!(ServerConfig::new_from_env().mail_relay.is_none());
        });
        with_env_vars(
            &[
                ("MAIL_RELAY_URL", "https://relay.test/send"),
                ("MAIL_RELAY_TOKEN", "secret"),
                ("MAIL_FROM", "no-reply@example.com"),
            ],
            || {
                let relay = ServerConfig::new_from_env().mail_relay.unwrap();
                assert_eq!(relay.url, "https://relay.test/send");
                // alerts fall back to the sender address
                assert_eq!(relay.notify_to, "no-reply@example.com");
            },
        );
    }

    #[test]
    fn weather_url_has_a_default() {
        with_env_vars(&[], || {
            assert_eq!(
                ServerConfig::new_from_env().weather_api_url,
                DEFAULT_WEATHER_API_URL
            );
        });
    }
}
