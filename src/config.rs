//! Configuration file structures for the Ranker bot.
//!
//! The configuration is a YAML file split into three sections: Roblox group
//! settings, Matrix account settings and bot settings. Every value can be
//! overridden with a `RANKER_`-prefixed environment variable, nested keys being
//! separated with `__` (e.g. `RANKER_ROBLOX__COOKIE`).
//!
//! # Configuration File Format
//!
//! ```yaml
//! roblox:
//!   # Id of the managed group
//!   group_id: 4242
//!   # .ROBLOSECURITY cookie of an account allowed to manage the group
//!   cookie: "_|WARNING:-DO-NOT-SHARE-THIS..."
//!   # Optional API base URLs
//!   users_url: "https://users.roblox.com"
//!   groups_url: "https://groups.roblox.com"
//!
//! matrix:
//!   # Fully qualified Matrix user ID for the bot account
//!   user_id: "@ranker:matrix.org"
//!   # Matrix account password
//!   password: "secret-password"
//!   # Optional passphrase encrypting the local store
//!   passphrase: "store-passphrase"
//!
//! bot:
//!   # Command name the bot answers to, `!ranker <command>`
//!   prefix: "ranker"
//! ```

use std::path::Path;

use anyhow::{Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::Deserialize;

pub const DEFAULT_USERS_URL: &str = "https://users.roblox.com";
pub const DEFAULT_GROUPS_URL: &str = "https://groups.roblox.com";
pub const DEFAULT_PREFIX: &str = "ranker";

/// Prefix of the environment variables overriding the configuration file.
const ENV_PREFIX: &str = "RANKER_";

/// Root configuration structure for the Ranker bot.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub roblox: Roblox,
    pub matrix: Matrix,
    #[serde(default)]
    pub bot: Bot,
}

/// Roblox group settings.
#[derive(Debug, Deserialize)]
pub struct Roblox {
    /// Id of the managed group.
    pub group_id: u64,

    /// `.ROBLOSECURITY` cookie sent with authenticated calls.
    pub cookie: String,

    /// Base URL of the users API.
    #[serde(default = "default_users_url")]
    pub users_url: String,

    /// Base URL of the groups API.
    #[serde(default = "default_groups_url")]
    pub groups_url: String,
}

/// Matrix account settings.
#[derive(Debug, Deserialize)]
pub struct Matrix {
    /// Fully qualified Matrix user ID of the bot account.
    pub user_id: String,

    pub password: String,

    /// Passphrase encrypting the local sqlite store.
    #[serde(default)]
    pub passphrase: Option<String>,
}

/// Bot settings.
#[derive(Debug, Deserialize)]
pub struct Bot {
    /// Command name the bot answers to.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for Bot {
    fn default() -> Self {
        Bot {
            prefix: default_prefix(),
        }
    }
}

fn default_users_url() -> String {
    DEFAULT_USERS_URL.to_owned()
}

fn default_groups_url() -> String {
    DEFAULT_GROUPS_URL.to_owned()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_owned()
}

impl Config {
    /// Loads the configuration from a YAML file, then applies the `RANKER_`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Fails when the file doesn't exist, isn't valid YAML, or when a required
    /// value is missing from both the file and the environment.
    pub fn load(path: &str) -> Result<Config> {
        if !Path::new(path).is_file() {
            bail!("config file {} not found", path);
        }

        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;
    use tempfile::NamedTempFile;

    use super::*;

    const FULL_CONFIG: &str = r#"
roblox:
  group_id: 4242
  cookie: "secret-cookie"
  users_url: "http://localhost:1234"
  groups_url: "http://localhost:5678"
matrix:
  user_id: "@ranker:example.com"
  password: "password"
  passphrase: "passphrase"
bot:
  prefix: "rank"
"#;

    const MINIMAL_CONFIG: &str = r#"
roblox:
  group_id: 4242
  cookie: "secret-cookie"
matrix:
  user_id: "@ranker:example.com"
  password: "password"
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn path(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        let file = write_config(FULL_CONFIG);

        let config = Config::load(path(&file)).unwrap();

        assert_eq!(config.roblox.group_id, 4242);
        assert_eq!(config.roblox.cookie, "secret-cookie");
        assert_eq!(config.roblox.users_url, "http://localhost:1234");
        assert_eq!(config.roblox.groups_url, "http://localhost:5678");
        assert_eq!(config.matrix.user_id, "@ranker:example.com");
        assert_eq!(config.matrix.passphrase.as_deref(), Some("passphrase"));
        assert_eq!(config.bot.prefix, "rank");
    }

    #[test]
    #[serial]
    fn test_load_minimal_config_uses_defaults() {
        let file = write_config(MINIMAL_CONFIG);

        let config = Config::load(path(&file)).unwrap();

        assert_eq!(config.roblox.users_url, DEFAULT_USERS_URL);
        assert_eq!(config.roblox.groups_url, DEFAULT_GROUPS_URL);
        assert!(config.matrix.passphrase.is_none());
        assert_eq!(config.bot.prefix, DEFAULT_PREFIX);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config(MINIMAL_CONFIG);
        unsafe {
            std::env::set_var("RANKER_ROBLOX__COOKIE", "env-cookie");
            std::env::set_var("RANKER_BOT__PREFIX", "envbot");
        }

        let config = Config::load(path(&file));

        unsafe {
            std::env::remove_var("RANKER_ROBLOX__COOKIE");
            std::env::remove_var("RANKER_BOT__PREFIX");
        }

        let config = config.unwrap();
        assert_eq!(config.roblox.cookie, "env-cookie");
        assert_eq!(config.bot.prefix, "envbot");
        assert_eq!(config.roblox.group_id, 4242);
    }

    #[test]
    #[serial]
    fn test_missing_required_value() {
        let file = write_config("roblox:\n  group_id: 1\n");

        assert!(Config::load(path(&file)).is_err());
    }

    #[test]
    #[serial]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.yaml");

        assert!(Config::load(missing.to_str().unwrap()).is_err());
    }
}
