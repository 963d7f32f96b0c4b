use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8, channel: u8 },
    NoteOff { note: u8, velocity: u8, channel: u8 },
    PolyPressure { note: u8, pressure: u8, channel: u8 },
    ControlChange { controller: u8, value: u8, channel: u8 },
    ProgramChange { program: u8, channel: u8 },
    ChannelPressure { pressure: u8, channel: u8 },
    PitchBend { value: u16, channel: u8 },
    System { status: u8, len: usize },
}

impl MidiEvent {
    pub fn decode(msg: &[u8]) -> Option<MidiEvent> {
        let status = *msg.first()?;
        if status < 0x80 { return None; }
        if status >= 0xF0 { return Some(MidiEvent::System { status, len: msg.len() }); }
        let channel = status & 0x0F;
        match status & 0xF0 {
            0x80 => Some(MidiEvent::NoteOff { note: *msg.get(1)? & 0x7F, velocity: *msg.get(2)? & 0x7F, channel }),
            0x90 => Some(MidiEvent::NoteOn { note: *msg.get(1)? & 0x7F, velocity: *msg.get(2)? & 0x7F, channel }),
            0xA0 => Some(MidiEvent::PolyPressure { note: *msg.get(1)? & 0x7F, pressure: *msg.get(2)? & 0x7F, channel }),
            0xB0 => Some(MidiEvent::ControlChange { controller: *msg.get(1)? & 0x7F, value: *msg.get(2)? & 0x7F, channel }),
            0xC0 => Some(MidiEvent::ProgramChange { program: *msg.get(1)? & 0x7F, channel }),
            0xD0 => Some(MidiEvent::ChannelPressure { pressure: *msg.get(1)? & 0x7F, channel }),
            0xE0 => {
                let lsb = (*msg.get(1)? & 0x7F) as u16;
                let msb = (*msg.get(2)? & 0x7F) as u16;
                Some(MidiEvent::PitchBend { value: lsb | (msb << 7), channel })
            }
            _ => None,
        }
    }

    pub fn channel(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::PolyPressure { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::ChannelPressure { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => Some(channel),
            MidiEvent::System { .. } => None,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            MidiEvent::NoteOn { .. } => "NOTE ON",
            MidiEvent::NoteOff { .. } => "NOTE OFF",
            MidiEvent::PolyPressure { .. } => "poly_pressure",
            MidiEvent::ControlChange { .. } => "control_change",
            MidiEvent::ProgramChange { .. } => "program_change",
            MidiEvent::ChannelPressure { .. } => "channel_pressure",
            MidiEvent::PitchBend { .. } => "pitch_bend",
            MidiEvent::System { .. } => "system",
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            MidiEvent::NoteOn { note, velocity, channel } => format!("note={note} velocity={velocity} channel={channel}"),
            MidiEvent::NoteOff { note, velocity, channel } => format!("note={note} velocity={velocity} channel={channel}"),
            MidiEvent::PolyPressure { note, pressure, channel } => format!("note={note} pressure={pressure} channel={channel}"),
            MidiEvent::ControlChange { controller, value, channel } => format!("controller={controller} value={value} channel={channel}"),
            MidiEvent::ProgramChange { program, channel } => format!("program={program} channel={channel}"),
            MidiEvent::ChannelPressure { pressure, channel } => format!("pressure={pressure} channel={channel}"),
            MidiEvent::PitchBend { value, channel } => format!("value={value} channel={channel}"),
            MidiEvent::System { status, len } => format!("status=0x{status:02X} len={len}"),
        }
    }
}

// First beam sits at the configured base note (C4 by default).
pub fn beam_index(note: u8, base_note: u8) -> i16 {
    note as i16 - base_note as i16
}
