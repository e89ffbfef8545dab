use clap::{Parser, Subcommand};
use huewheel::config;
use huewheel::sys::server::SOCKET_PATH;
use hueshape::PickerKind;
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "huectl", version, about = "Control a running huewheel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Replay the entrance animation of the visible picker
    Show,
    /// Make the pickers re-read the palette
    Reload,
    /// Change the number of colors
    Count {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=config::MAX_COLORS as i64))]
        count: u32,
    },
    /// Switch between the radial and grid pickers
    Variant {
        /// radial (circle, r) or grid (g)
        variant: PickerKind,
    },
    /// Write the default config file if missing and print its path
    InitConfig,
}

impl Commands {
    fn line(&self) -> Option<String> {
        match self {
            Self::Show => Some("show".to_string()),
            Self::Reload => Some("reload".to_string()),
            Self::Count { count } => Some(format!("count {}", count)),
            Self::Variant { variant } => Some(format!("variant {}", variant)),
            Self::InitConfig => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.line() {
        Some(line) => send_command(&line),
        None => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to huewheel at {}: {}. Is huewheel running?",
            SOCKET_PATH,
            e
        )
    })?;
    log::debug!("Sending '{}'", cmd);
    writeln!(stream, "{}", cmd)?;
    Ok(())
}
