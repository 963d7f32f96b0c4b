use anyhow::*;
use midir::MidiOutput;
use std::thread::sleep;
use std::time::Duration;

const NOTE_ON: u8 = 0x90;
const NOTE_OFF: u8 = 0x80;

// note = base + beam * interval, same mapping the harp firmware uses;
// beams that would land above MIDI note 127 are dropped.
pub fn beam_notes(base_note: u8, beams: u8, interval: u8) -> Vec<u8> {
    (0..beams as u16)
        .map(|b| base_note as u16 + b * interval as u16)
        .take_while(|&n| n <= 127)
        .map(|n| n as u8)
        .collect()
}

pub fn run_beam_test(port_query: &str, beams: u8, base_note: u8, interval: u8, velocity: u8, channel: u8) -> Result<()> {
    let out = MidiOutput::new("harpmon")?;
    let ports = out.ports();
    if ports.is_empty() {
        println!("No MIDI output ports found!");
        return Ok(());
    }
    let mut sel = None;
    for port in &ports {
        let name = out.port_name(port)?;
        if name.to_lowercase().contains(&port_query.to_lowercase()) { sel = Some((port.clone(), name)); break; }
    }
    let (port, name) = sel.ok_or_else(|| anyhow!("No MIDI output matching '{port_query}'"))?;
    let mut conn = out.connect(&port, "beam-test").map_err(|e| anyhow!(e.to_string()))?;

    let channel = channel & 0x0F;
    let notes = beam_notes(base_note, beams, interval);
    if (notes.len() as u8) < beams {
        log::warn!("{} beam(s) map above MIDI note 127, skipped", beams - notes.len() as u8);
    }

    println!("Sending beam sweep to '{name}'");
    for (beam, &note) in notes.iter().enumerate() {
        println!("Beam {beam}: note {note}");
        conn.send(&[NOTE_ON | channel, note, velocity & 0x7F])?;
        sleep(Duration::from_millis(200));
        conn.send(&[NOTE_OFF | channel, note, 0])?;
        sleep(Duration::from_millis(100));
    }
    conn.close();
    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chromatic_sweep_from_c4() {
        assert_eq!(beam_notes(60, 7, 1), vec![60, 61, 62, 63, 64, 65, 66]);
    }

    #[test]
    fn whole_tone_sweep() {
        assert_eq!(beam_notes(60, 7, 2), vec![60, 62, 64, 66, 68, 70, 72]);
    }

    #[test]
    fn notes_above_midi_range_are_dropped() {
        assert_eq!(beam_notes(125, 7, 1), vec![125, 126, 127]);
        assert_eq!(beam_notes(120, 7, 4), vec![120, 124]);
    }

    #[test]
    fn zero_beams_is_empty() {
        assert!(beam_notes(60, 0, 1).is_empty());
    }
}
