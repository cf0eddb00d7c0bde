//! Minimal CLI parsing for configuration overrides.

use std::env;

use crate::config::Config;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg, None),
            };
            let mut value = || inline.clone().or_else(|| args.next());

            match flag.as_str() {
                "--host" => options.host = value(),
                "--port" => options.port = value().and_then(|v| v.parse().ok()),
                "--database-url" => options.database_url = value(),
                _ => {}
            }
        }
        options
    }

    /// Apply overrides on top of the environment configuration
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = self.database_url {
            config.database_url = url;
        }
        config
    }
}
