use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 4221;

/// Runtime configuration for the server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the accept loop binds to (e.g. "0.0.0.0:4221")
    pub listen_addr: String,
    /// Root directory for `/files/` requests
    pub directory: PathBuf,
    /// How long a single accept waits before the shutdown flag is rechecked
    pub accept_poll_interval: Duration,
    /// How long to wait for open connections after the accept loop stops
    pub drain_timeout: Duration,
}

/// On-disk YAML representation. Every field is optional and overrides
/// the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub directory: Option<PathBuf>,
    pub accept_poll_interval_secs: Option<u64>,
    pub drain_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            directory: PathBuf::from("."),
            accept_poll_interval: Duration::from_secs(10),
            drain_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Loads configuration from the process arguments and environment.
    pub fn load() -> anyhow::Result<Self> {
        let port = std::env::var("PORT").ok();
        Self::from_sources(std::env::args().skip(1), port)
    }

    /// Builds a config from command-line arguments (program name already
    /// stripped) and the value of the `PORT` variable.
    ///
    /// Precedence, lowest first: defaults, `--config` file, `PORT`,
    /// `--directory`.
    pub fn from_sources<I, S>(args: I, port_env: Option<String>) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args = Args::from_args(args)?;

        let mut cfg = Self::default();
        let mut host = DEFAULT_HOST.to_string();
        let mut port = DEFAULT_PORT;

        if let Some(path) = &args.config {
            let file = FileConfig::read(path)?;
            if let Some(h) = file.host {
                host = h;
            }
            if let Some(p) = file.port {
                port = p;
            }
            if let Some(dir) = file.directory {
                cfg.directory = dir;
            }
            if let Some(secs) = file.accept_poll_interval_secs {
                cfg.accept_poll_interval = Duration::from_secs(secs.max(1));
            }
            if let Some(secs) = file.drain_timeout_secs {
                cfg.drain_timeout = Duration::from_secs(secs);
            }
        }

        if let Some(raw) = port_env.filter(|p| !p.is_empty()) {
            port = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT value {:?}", raw))?;
        }

        if let Some(dir) = args.directory {
            cfg.directory = dir;
        }

        cfg.listen_addr = format!("{}:{}", host, port);
        Ok(cfg)
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Command-line arguments.
#[derive(Parser, Debug, Default)]
#[command(version, about = "A minimal HTTP/1.1 file and echo server", long_about = None)]
pub struct Args {
    /// Root directory for `/files/` requests
    #[arg(long)]
    pub directory: Option<PathBuf>,
    /// Optional YAML config file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parses arguments that do not include the program name.
    fn from_args<I, S>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv = std::iter::once(env!("CARGO_PKG_NAME").to_string())
            .chain(args.into_iter().map(Into::into));
        Ok(Self::try_parse_from(argv)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_accept_both_spellings() {
        let args = Args::from_args(["--directory", "/tmp/a"]).unwrap();
        assert_eq!(args.directory, Some(PathBuf::from("/tmp/a")));

        let args = Args::from_args(["--directory=/tmp/b"]).unwrap();
        assert_eq!(args.directory, Some(PathBuf::from("/tmp/b")));
    }

    #[test]
    fn flag_without_value_is_rejected() {
        assert!(Args::from_args(["--directory"]).is_err());
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(Args::from_args(["--verbose"]).is_err());
    }
}
