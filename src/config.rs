use std::path::PathBuf;

use crate::error::{CrmError, CrmResult};

pub const DEFAULT_DB_PATH: &str = ".data/dealerpilot.db";
pub const DEFAULT_LOG_FILTER: &str = "dealerpilot=info";

pub const ENV_DB: &str = "DEALERPILOT_DB";
pub const ENV_USER: &str = "DEALERPILOT_USER";
pub const ENV_LOG: &str = "DEALERPILOT_LOG";

/// Runtime settings for the `dealerpilot` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// User id the session acts as. None picks a manager from the database.
    pub acting_user: Option<String>,
    /// `tracing` filter directive, overridden by `RUST_LOG` when set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            acting_user: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Config),
    Help,
}

impl Config {
    /// Defaults, then environment, then flags.
    pub fn resolve() -> CrmResult<Invocation> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    pub fn from_sources<I, E>(args: I, env: E) -> CrmResult<Invocation>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = env(ENV_DB).filter(|s| !s.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(user) = env(ENV_USER).filter(|s| !s.trim().is_empty()) {
            config.acting_user = Some(user.trim().to_string());
        }
        if let Some(filter) = env(ENV_LOG).filter(|s| !s.trim().is_empty()) {
            config.log_filter = filter;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--file" | "-f" => {
                    config.db_path = PathBuf::from(require_value(&mut args, &arg)?);
                }
                "--as" | "-u" => {
                    config.acting_user = Some(require_value(&mut args, &arg)?);
                }
                "--log" => {
                    config.log_filter = require_value(&mut args, &arg)?;
                }
                "--help" | "-h" => return Ok(Invocation::Help),
                other => {
                    return Err(CrmError::Config(format!("Unknown argument: {}", other)));
                }
            }
        }

        Ok(Invocation::Run(config))
    }
}

fn require_value<I: Iterator<Item = String>>(args: &mut I, flag: &str) -> CrmResult<String> {
    args.next()
        .filter(|v| !v.starts_with('-'))
        .ok_or_else(|| CrmError::Config(format!("{} requires a value", flag)))
}

pub fn usage() -> &'static str {
    "DealerPilot - round-robin lead routing

Usage: dealerpilot [OPTIONS]

Options:
  -f, --file <PATH>      Database file path (default: .data/dealerpilot.db)
  -u, --as <USER_ID>     Act as this user (default: first manager)
      --log <FILTER>     Log filter (default: dealerpilot=info)
  -h, --help             Show this help

Environment:
  DEALERPILOT_DB, DEALERPILOT_USER, DEALERPILOT_LOG  same as the flags above
  RUST_LOG                                            overrides the log filter"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_args_or_env() {
        let inv = Config::from_sources(args(&[]), no_env).unwrap();
        assert_eq!(inv, Invocation::Run(Config::default()));
    }

    #[test]
    fn flags_override_environment() {
        let env = |key: &str| match key {
            ENV_DB => Some("/tmp/env.db".to_string()),
            ENV_USER => Some("u1".to_string()),
            _ => None,
        };
        let inv = Config::from_sources(args(&["-f", "/tmp/flag.db"]), env).unwrap();
        match inv {
            Invocation::Run(cfg) => {
                assert_eq!(cfg.db_path, PathBuf::from("/tmp/flag.db"));
                assert_eq!(cfg.acting_user.as_deref(), Some("u1"));
                assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
            }
            Invocation::Help => panic!("expected run"),
        }
    }

    #[test]
    fn help_flag() {
        assert_eq!(Config::from_sources(args(&["--help"]), no_env).unwrap(), Invocation::Help);
    }

    #[test]
    fn missing_value_is_error() {
        assert!(Config::from_sources(args(&["--as"]), no_env).is_err());
        assert!(Config::from_sources(args(&["--file", "--log"]), no_env).is_err());
    }

    #[test]
    fn unknown_flag_is_error() {
        assert!(Config::from_sources(args(&["--verbose"]), no_env).is_err());
    }
}
