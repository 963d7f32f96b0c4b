use anyhow::*;
use midir::{Ignore, MidiInput, MidiInputPort};
use std::io::{self, Write};
use std::result::Result::Ok;

pub const AUTO_MATCH: &str = "daisy";

pub fn new_input() -> Result<MidiInput> {
    let mut inp = MidiInput::new("harpmon")?;
    inp.ignore(Ignore::None);
    Ok(inp)
}

pub fn port_names(inp: &MidiInput) -> Vec<String> {
    inp.ports().iter().enumerate()
        .map(|(i, port)| inp.port_name(port).unwrap_or_else(|_| format!("Unknown Device {i}")))
        .collect()
}

fn print_ports(names: &[String]) {
    println!("\n=== Available MIDI Input Ports ===");
    if names.is_empty() {
        println!("No MIDI input ports found!");
        return;
    }
    for (i, name) in names.iter().enumerate() {
        println!("{i}: {name}");
    }
}

pub fn list_midi_ports() -> Result<()> {
    let inp = new_input()?;
    print_ports(&port_names(&inp));
    Ok(())
}

pub fn find_match(names: &[String], pattern: &str) -> Option<usize> {
    let pattern = pattern.to_lowercase();
    names.iter().position(|n| n.to_lowercase().contains(&pattern))
}

#[derive(Debug, PartialEq)]
pub enum Choice {
    Quit,
    Index(usize),
    Invalid(&'static str),
}

pub fn parse_choice(line: &str, count: usize) -> Choice {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    match line.parse::<usize>() {
        Ok(i) if i < count => Choice::Index(i),
        Ok(_) => Choice::Invalid("Invalid port number!"),
        Err(_) => Choice::Invalid("Invalid input!"),
    }
}

// Lists ports, then picks one: explicit substring query beats the "daisy"
// auto-match, which beats the interactive prompt. None means nothing to open
// (no ports, user quit, or bad input) and the caller exits normally.
pub fn resolve_port(inp: &MidiInput, query: Option<&str>) -> Result<Option<(MidiInputPort, String)>> {
    let ports = inp.ports();
    let names = port_names(inp);
    print_ports(&names);
    if ports.is_empty() {
        println!("\nMake sure the LaserHarp is connected via USB!");
        return Ok(None);
    }

    if let Some(query) = query {
        let i = find_match(&names, query).ok_or_else(|| anyhow!("No MIDI input matching '{query}'"))?;
        return Ok(Some((ports[i].clone(), names[i].clone())));
    }

    if let Some(i) = find_match(&names, AUTO_MATCH) {
        println!("\nAuto-selected: {}", names[i]);
        return Ok(Some((ports[i].clone(), names[i].clone())));
    }

    print!("\nEnter port number to monitor (or 'q' to quit): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    match parse_choice(&line, names.len()) {
        Choice::Quit => Ok(None),
        Choice::Index(i) => Ok(Some((ports[i].clone(), names[i].clone()))),
        Choice::Invalid(msg) => {
            println!("{msg}");
            Ok(None)
        }
    }
}
