mod midi { pub mod beam_test; pub mod capture; pub mod event; pub mod monitor; pub mod ports; }

use anyhow::*;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name="harpmon", version, about="LaserHarp MIDI diagnostics")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd
}

#[derive(Subcommand)]
enum Cmd {
    /// List MIDI input ports
    Ports,
    /// Watch incoming MIDI messages (auto-selects the harp)
    Monitor {
        #[arg(long)] port: Option<String>,
        #[arg(long, default_value_t = 60)] base_note: u8,
        #[arg(long)] channel: Option<u8>,
    },
    /// Capture decoded MIDI messages to a JSONL file
    Capture {
        #[arg(long)] port: Option<String>,
        #[arg(long)] out: String,
        #[arg(long, default_value_t = 60)] base_note: u8,
    },
    /// Send a note sweep across the beams to a MIDI output
    BeamTest {
        #[arg(long)] port: String,
        #[arg(long, default_value_t = 7)] beams: u8,
        #[arg(long, default_value_t = 60)] base_note: u8,
        #[arg(long, default_value_t = 1)] interval: u8,
        #[arg(long, default_value_t = 100)] velocity: u8,
        #[arg(long, default_value_t = 0)] channel: u8,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Ports => midi::ports::list_midi_ports()?,
        Cmd::Monitor { port, base_note, channel } => midi::monitor::run_monitor(port.as_deref(), base_note, channel)?,
        Cmd::Capture { port, out, base_note } => midi::capture::capture_to_jsonl(port.as_deref(), &out, base_note)?,
        Cmd::BeamTest { port, beams, base_note, interval, velocity, channel } =>
            midi::beam_test::run_beam_test(&port, beams, base_note, interval, velocity, channel)?,
    }
    Ok(())
}
