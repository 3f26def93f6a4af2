use clap::Parser;

use crate::config::{ApiMode, AppConfig};

/// Command-line overrides; anything given here wins over the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "todo-api")]
#[command(about = "Todo API - JSON todo-list server with optional JWT accounts")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (default from TODO_API_HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (default from TODO_API_PORT or PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "API mode: open or authenticated")]
    pub mode: Option<ApiMode>,

    #[arg(long, help = "PostgreSQL URL, or 'memory' for the in-process store")]
    pub database_url: Option<String>,
}

impl Cli {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(url) = &self.database_url {
            config.database.url = Some(url.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from(["todo-api", "--port", "9000", "--mode", "authenticated", "--database-url", "memory"])
            .unwrap();
        let mut config = AppConfig::development();
        cli.apply(&mut config);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.mode, ApiMode::Authenticated);
        assert_eq!(config.database.url.as_deref(), Some("memory"));
    }

    #[test]
    fn no_flags_leave_config_alone() {
        let cli = Cli::try_parse_from(["todo-api"]).unwrap();
        let mut config = AppConfig::development();
        let before = config.server.port;
        cli.apply(&mut config);
        assert_eq!(config.server.port, before);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["todo-api", "--mode", "sideways"]).is_err());
    }
}
