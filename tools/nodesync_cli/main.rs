//! NodeSync diagnostic CLI: lists serial ports and opens a node the same way
//! the library does, reporting what ends up in the session cache.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nodesync_lib::io::serial::select_candidates;
use nodesync_lib::{
    init_logging, list_ports, prepare_node_sync, DebugLevel, NodeSyncError, SerialProvider,
    SessionHandleCache, Settings,
};

#[derive(Parser)]
#[command(name = "nodesync_cli", version, about = "Open mesh-radio nodes over serial")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (defaults to <config dir>/nodesync/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug level 0-3
    #[arg(short, long, global = true)]
    debug: Option<u8>,
}

#[derive(Subcommand)]
enum Command {
    /// List serial ports and mark auto-detect candidates
    Ports,

    /// Open a node and keep it in the session cache
    Connect {
        /// Serial port; auto-detected when omitted
        #[arg(short, long)]
        port: Option<String>,

        /// Baud rate
        #[arg(short, long)]
        baud: Option<u32>,
    },
}

fn load_settings(cli: &Cli) -> Result<Settings, NodeSyncError> {
    let path = match cli.config {
        Some(ref path) => path.clone(),
        None => Settings::default_path()?,
    };
    let mut settings = Settings::load(&path)?;
    settings.apply_env()?;
    if let Some(level) = cli.debug {
        settings.debug_level = DebugLevel::from(level);
    }
    if let Command::Connect { ref port, baud } = cli.command {
        if port.is_some() {
            settings.port = port.clone();
        }
        if let Some(baud) = baud {
            settings.line.baud_rate = baud;
        }
    }
    Ok(settings)
}

fn print_ports() -> Result<(), NodeSyncError> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
        return Ok(());
    }
    let candidates = select_candidates(&ports);
    for p in &ports {
        let marker = if candidates.contains(&p.port_name) { "*" } else { " " };
        let ids = match (p.vid, p.pid) {
            (Some(vid), Some(pid)) => format!("{:04x}:{:04x}", vid, pid),
            _ => "----:----".to_string(),
        };
        println!(
            "{} {:<28} {:<9} {} {}",
            marker,
            p.port_name,
            p.port_type,
            ids,
            p.product.as_deref().unwrap_or("")
        );
    }
    println!("* = auto-detect candidate");
    Ok(())
}

fn connect(settings: &Settings) -> Result<(), NodeSyncError> {
    let provider = SerialProvider::new(settings.line.clone());
    let mut cache = SessionHandleCache::with_debug(settings.debug_level.is_enabled());
    prepare_node_sync(
        &mut cache,
        &provider,
        settings.port.as_deref(),
        settings.debug_level,
    )?;
    match cache.get_handle() {
        Some(interface) => println!(
            "Connected to {} at {} baud",
            interface.port_name(),
            interface.baud_rate()
        ),
        None => println!("No interface in session cache"),
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), NodeSyncError> {
    let settings = load_settings(&cli)?;
    init_logging(settings.debug_level, settings.log_dir.as_deref())?;

    match cli.command {
        Command::Ports => print_ports(),
        Command::Connect { .. } => connect(&settings),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_connection_failure() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
