use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::bootstrap::RenderOptions;
use crate::info_fetch::JoinMode;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub template: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    pub join: JoinMode,
    pub clear_containers: bool,
    pub offline: bool,
    pub use_cache: bool,
    pub quiet: bool,
}

impl RunConfig {
    /// Flags win over environment variables. Every argument must be a known
    /// flag or the value of the flag before it.
    pub fn from_args_and_env(args: &[String]) -> Result<Self> {
        let mut cfg = RunConfig::default();
        let mut join_flag = None;

        let mut idx = 0;
        while idx < args.len() {
            let arg = args[idx].as_str();
            idx += 1;

            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if VALUE_FLAGS.contains(&flag) => (flag, Some(value)),
                _ => (arg, None),
            };

            if VALUE_FLAGS.contains(&flag) {
                let value = match inline {
                    Some(value) => value.trim(),
                    None => {
                        let next = args
                            .get(idx)
                            .map(|s| s.trim())
                            .filter(|s| !s.starts_with("--"));
                        if next.is_some() {
                            idx += 1;
                        }
                        next.unwrap_or_default()
                    }
                };
                if value.is_empty() || value.starts_with("--") {
                    return Err(anyhow!("{flag} requires a value"));
                }
                match flag {
                    "--template" => cfg.template = Some(PathBuf::from(value)),
                    "--out" => cfg.out = Some(PathBuf::from(value)),
                    "--summary" => cfg.summary = Some(PathBuf::from(value)),
                    _ => join_flag = Some(value.parse::<JoinMode>()?),
                }
                continue;
            }

            match flag {
                "--clear" => cfg.clear_containers = true,
                "--offline" => cfg.offline = true,
                "--cache" => cfg.use_cache = true,
                "--quiet" => cfg.quiet = true,
                "--help" => {}
                other if other.starts_with("--") => {
                    return Err(anyhow!("unknown argument: {other}"));
                }
                other => return Err(anyhow!("unexpected argument: {other}")),
            }
        }

        cfg.join = match join_flag {
            Some(join) => join,
            None => match opt_env("ROSTER_JOIN") {
                Some(raw) => raw.parse::<JoinMode>().context("invalid ROSTER_JOIN")?,
                None => JoinMode::default(),
            },
        };
        cfg.offline |= env_flag("ROSTER_OFFLINE");
        cfg.use_cache |= env_flag("ROSTER_HTTP_CACHE");
        Ok(cfg)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            join: self.join,
            clear_containers: self.clear_containers,
        }
    }
}

pub const USAGE: &str = "\
usage: roster_cards [--template <path>] [--out <path>] [--summary <path>]
                    [--join=position|name] [--clear] [--offline] [--cache] [--quiet]";

const VALUE_FLAGS: &[&str] = &["--template", "--out", "--summary", "--join"];

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn opt_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|val| {
        if val.trim().is_empty() {
            None
        } else {
            Some(val)
        }
    })
}

fn env_flag(key: &str) -> bool {
    opt_env(key).is_some_and(|val| {
        matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        )
    })
}
