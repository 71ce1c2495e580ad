//! Command-line arguments and terminal commands.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{LinkConfig, DEFAULT_HOST_URL};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "hangeul-melody")]
#[command(about = "Play Hangeul syllables as notes and stream them to a visualization host", long_about = None)]
pub struct Args {
    /// WebSocket URL of the visualization host
    #[arg(long, value_name = "URL", default_value = DEFAULT_HOST_URL)]
    pub url: String,

    /// Automatic reconnect attempts before manual reconnect is required
    #[arg(long, value_name = "COUNT", default_value_t = 5)]
    pub max_reconnect_attempts: u32,

    /// Backoff unit; attempt n waits n times this long
    #[arg(long, value_name = "MILLIS", default_value_t = 2000)]
    pub reconnect_base_ms: u64,

    /// Give up on a connect or handshake after this long
    #[arg(long, value_name = "MILLIS", default_value_t = 3000)]
    pub connect_timeout_ms: u64,

    /// Run without an audio device
    #[arg(long)]
    pub mute: bool,

    /// Record everything played to a WAV file
    #[arg(long, value_name = "WAV")]
    pub record: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Write rotating log files here instead of stderr
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    /// Link configuration from the arguments, validated
    pub fn link_config(&self) -> Result<LinkConfig, String> {
        let config = LinkConfig {
            url: self.url.clone(),
            max_reconnect_attempts: self.max_reconnect_attempts,
            reconnect_base_ms: self.reconnect_base_ms,
            connect_timeout_ms: self.connect_timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }
}

/// One line typed into the terminal surface
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Text typed into the input field
    Type(String),
    Pointer { x: f64, y: f64 },
    Clear,
    Reconnect,
    Status,
    /// Print the debug log, or only its last `tail` entries
    Log { tail: Option<usize> },
    Quit,
}

impl Command {
    /// Parse a line. Lines starting with `:` are commands, anything else is
    /// typed text.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\r', '\n']);
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Type(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        match parts.next() {
            Some("pointer") => {
                let x = parse_axis(parts.next(), "X")?;
                let y = parse_axis(parts.next(), "Y")?;
                Ok(Self::Pointer { x, y })
            }
            Some("clear") => Ok(Self::Clear),
            Some("reconnect") => Ok(Self::Reconnect),
            Some("status") => Ok(Self::Status),
            Some("log") => {
                let tail = parts
                    .next()
                    .map(|count| {
                        count
                            .parse::<usize>()
                            .map_err(|_| format!("Usage: :log [COUNT], got '{}'", count))
                    })
                    .transpose()?;
                Ok(Self::Log { tail })
            }
            Some("quit") | Some("q") => Ok(Self::Quit),
            Some(other) => Err(format!("Unknown command ':{}'", other)),
            None => Err("Empty command".to_string()),
        }
    }
}

fn parse_axis(value: Option<&str>, name: &str) -> Result<f64, String> {
    let value = value.ok_or_else(|| format!("Usage: :pointer X Y (missing {})", name))?;
    value
        .parse::<f64>()
        .map_err(|_| format!("{} must be a number, got '{}'", name, value))
}
