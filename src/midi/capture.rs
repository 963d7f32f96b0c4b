use anyhow::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use std::result::Result::Ok;

use crate::midi::event::{beam_index, MidiEvent};
use crate::midi::ports::{new_input, resolve_port};

#[derive(Serialize)]
struct CaptureRecord {
    t_ms: u128,
    #[serde(flatten)]
    event: MidiEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    beam: Option<i16>,
    raw: Vec<u8>,
}

impl CaptureRecord {
    fn new(t_ms: u128, event: MidiEvent, base_note: u8, raw: &[u8]) -> Self {
        let beam = match event {
            MidiEvent::NoteOn { note, .. } | MidiEvent::NoteOff { note, .. } => Some(beam_index(note, base_note)),
            _ => None,
        };
        Self { t_ms, event, beam, raw: raw.to_vec() }
    }
}

pub fn capture_to_jsonl(port_query: Option<&str>, path: &str, base_note: u8) -> Result<()> {
    let inp = new_input()?;
    let Some((port, name)) = resolve_port(&inp, port_query)? else { return Ok(()) };
    println!("\nCapturing from MIDI '{name}' → {path}");

    let start = Instant::now();
    let file = Arc::new(Mutex::new(File::create(path)?));
    let file_c = file.clone();

    let _conn = inp.connect(&port, "capture", move |_, msg, _| {
        let Some(event) = MidiEvent::decode(msg) else {
            log::trace!("ignoring {} unparseable byte(s): {msg:02X?}", msg.len());
            return;
        };
        let rec = CaptureRecord::new(start.elapsed().as_millis(), event, base_note, msg);
        if let Ok(mut f) = file_c.lock() {
            if let Ok(line) = serde_json::to_string(&rec) { let _ = writeln!(f, "{line}"); }
        }
    }, ()).map_err(|e| anyhow!(e.to_string()))?;
    log::info!("connected to '{name}'");

    println!("Press Q then Enter to stop…");

    // Stop flag set by Ctrl+C or by typing Q + Enter
    let stop = Arc::new(AtomicBool::new(false));
    let stop_c = stop.clone();
    let _ = ctrlc::set_handler(move || { stop_c.store(true, Ordering::SeqCst); });
    {
        let stop_kb = stop.clone();
        std::thread::spawn(move || {
            let mut line = String::new();
            loop {
                line.clear();
                if io::stdin().read_line(&mut line).is_err() { break; }
                if line.trim().eq_ignore_ascii_case("q") { stop_kb.store(true, Ordering::SeqCst); break; }
            }
        });
    }

    while !stop.load(Ordering::SeqCst) { std::thread::sleep(std::time::Duration::from_millis(200)); }
    println!("Saved {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_record_serializes_with_kind_and_beam() {
        let rec = CaptureRecord::new(125, MidiEvent::NoteOn { note: 62, velocity: 100, channel: 0 }, 60, &[0x90, 62, 100]);
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(json["t_ms"], 125);
        assert_eq!(json["kind"], "note_on");
        assert_eq!(json["note"], 62);
        assert_eq!(json["velocity"], 100);
        assert_eq!(json["beam"], 2);
        assert_eq!(json["raw"], serde_json::json!([0x90, 62, 100]));
    }

    #[test]
    fn non_note_record_has_no_beam_field() {
        let rec = CaptureRecord::new(0, MidiEvent::ControlChange { controller: 7, value: 90, channel: 1 }, 60, &[0xB1, 7, 90]);
        let json: serde_json::Value = serde_json::from_str(&serde_json::to_string(&rec).unwrap()).unwrap();
        assert_eq!(json["kind"], "control_change");
        assert!(json.get("beam").is_none());
    }
}
