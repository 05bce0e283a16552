/// A single client command, constructed from one line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    IncreaseGain,
    DecreaseGain,
    IncreaseExposure,
    DecreaseExposure,
    ToggleHdr,
    IncreaseSharpness,
    DecreaseSharpness,
    Stop,
    Unknown(String),
}

/// Map one line of client input to a command. Matching is case-insensitive
/// and ignores surrounding whitespace; whitespace-only lines yield `None`.
pub fn parse(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let command = match trimmed.to_ascii_lowercase().as_str() {
        "stop" => Command::Stop,
        "g+" => Command::IncreaseGain,
        "g-" => Command::DecreaseGain,
        "ev+" => Command::IncreaseExposure,
        "ev-" => Command::DecreaseExposure,
        "hdr" => Command::ToggleHdr,
        "sharp+" => Command::IncreaseSharpness,
        "sharp-" => Command::DecreaseSharpness,
        _ => Command::Unknown(trimmed.to_string()),
    };
    Some(command)
}
