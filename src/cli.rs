use clap::{ArgAction, Parser};

#[derive(Parser)]
#[command(name = "crosshair")]
#[command(about = "Click-through crosshair overlay for X11")]
#[command(version)]
pub struct Cli {
    /// X11 display to connect to (defaults to $DISPLAY)
    #[arg(long)]
    pub display: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default `env_logger` filter; `RUST_LOG` still wins.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
