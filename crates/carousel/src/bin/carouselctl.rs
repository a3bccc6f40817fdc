use anyhow::Context;
use carousel::config;
use carousel::sys::server::SOCKET_PATH;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser)]
#[command(name = "carouselctl", about = "Control a running carousel")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rotate one step to the left
    Left,
    /// Rotate one step to the right
    Right,
    /// Ask the running app to re-read its config
    Reload,
    /// Write the default config file if none exists
    InitConfig,
}

fn send_command(command: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH)
        .with_context(|| format!("Failed to connect to {}", SOCKET_PATH))?;
    writeln!(stream, "{}", command)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Left => send_command("left"),
        Command::Right => send_command("right"),
        Command::Reload => send_command("reload"),
        Command::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
