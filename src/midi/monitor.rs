use anyhow::*;
use crossbeam_channel::{unbounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use std::result::Result::Ok;

use crate::midi::event::{beam_index, MidiEvent};
use crate::midi::ports::{new_input, resolve_port};

fn format_row(ts: &str, ev: &MidiEvent, base_note: u8) -> String {
    match *ev {
        MidiEvent::NoteOn { note, velocity, channel } => {
            format!("{ts} | NOTE ON   | {note:3} | {velocity:3}      | {channel:2}  <- Beam {}", beam_index(note, base_note))
        }
        MidiEvent::NoteOff { note, velocity, channel } => {
            format!("{ts} | NOTE OFF  | {note:3} | {velocity:3}      | {channel:2}  <- Beam {}", beam_index(note, base_note))
        }
        ref other => format!("{ts} | {:9} | {}", other.kind_label(), other.describe()),
    }
}

pub fn run_monitor(port_query: Option<&str>, base_note: u8, channel: Option<u8>) -> Result<()> {
    println!("{}", "=".repeat(60));
    println!("   LaserHarp MIDI Monitor");
    println!("{}", "=".repeat(60));

    let inp = new_input()?;
    let Some((port, name)) = resolve_port(&inp, port_query)? else { return Ok(()) };

    println!("\n=== Monitoring MIDI from: {name} ===");
    println!("Press Ctrl+C to stop\n");
    println!("Time       | Type      | Note | Velocity | Channel");
    println!("{}", "-".repeat(60));

    let (tx, rx) = unbounded();
    let _conn = inp.connect(&port, "monitor", move |_, msg, _| {
        match MidiEvent::decode(msg) {
            Some(ev) => { let _ = tx.send((chrono::Local::now(), ev)); }
            None => log::trace!("ignoring {} unparseable byte(s): {msg:02X?}", msg.len()),
        }
    }, ()).map_err(|e| anyhow!(e.to_string()))?;
    log::info!("connected to '{name}'");

    let stop = Arc::new(AtomicBool::new(false));
    let stop_c = stop.clone();
    let _ = ctrlc::set_handler(move || { stop_c.store(true, Ordering::SeqCst); });

    loop {
        if stop.load(Ordering::SeqCst) {
            println!("\n\nMonitoring stopped.");
            break;
        }
        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok((at, ev)) => {
                if let (Some(want), Some(ch)) = (channel, ev.channel()) {
                    if ch != want { continue; }
                }
                println!("{}", format_row(&at.format("%H:%M:%S%.3f").to_string(), &ev, base_note));
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                eprintln!("\nError: MIDI input closed unexpectedly");
                break;
            }
        }
    }
    Ok(())
}
