use super::app_config::LogLevel;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "termgram",
    version,
    about = "A keyboard-driven terminal messaging client",
    long_about = None
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Session token; takes precedence over the stored session.
    #[arg(long, env = "TERMGRAM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Base URL of the backend HTTP API.
    #[arg(long, value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// WebSocket URL of the backend push feed.
    #[arg(long, value_name = "URL")]
    pub feed_url: Option<String>,

    /// Send and show typing indicators.
    #[arg(long)]
    pub show_typing: Option<bool>,

    /// Enable desktop notifications.
    #[arg(long)]
    pub enable_desktop_notifications: Option<bool>,

    /// Include message text in desktop notifications.
    #[arg(long)]
    pub notification_preview: Option<bool>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Validate a session token and store it in the system keyring.
    Login {
        /// Token to store; prompted for when omitted.
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove the stored session.
    Logout,
    /// Print the log file location.
    Logs {
        /// Open the log file with the default viewer.
        #[arg(long)]
        open: bool,
    },
    /// Print version information.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_launches_ui() {
        let args = CliArgs::parse_from(["termgram"]);
        assert_eq!(args.command, None);
    }

    #[test]
    fn test_login_subcommand() {
        let args = CliArgs::parse_from(["termgram", "login", "--token", "abc"]);
        assert_eq!(
            args.command,
            Some(Command::Login {
                token: Some("abc".to_string())
            })
        );
    }

    #[test]
    fn test_global_flag_after_subcommand() {
        let args = CliArgs::parse_from(["termgram", "logs", "--open", "--log-level", "debug"]);
        assert_eq!(args.command, Some(Command::Logs { open: true }));
        assert_eq!(args.log_level, Some(LogLevel::Debug));
    }
}
