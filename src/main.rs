mod cli;
mod crosshair;
mod event_loop;
mod hotkey;
mod mask;
mod shutdown;

#[cfg(target_os = "linux")]
mod linux;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    #[cfg(target_os = "linux")]
    {
        linux::run(&cli)
    }

    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("crosshair needs an X11 display server (Linux only)")
    }
}
