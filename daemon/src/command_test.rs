#[cfg(test)]
mod tests {
    use crate::command::{parse, Command};

    #[test]
    fn test_parse_known_commands() {
        assert_eq!(parse("stop"), Some(Command::Stop));
        assert_eq!(parse("g+"), Some(Command::IncreaseGain));
        assert_eq!(parse("g-"), Some(Command::DecreaseGain));
        assert_eq!(parse("ev+"), Some(Command::IncreaseExposure));
        assert_eq!(parse("ev-"), Some(Command::DecreaseExposure));
        assert_eq!(parse("hdr"), Some(Command::ToggleHdr));
        assert_eq!(parse("sharp+"), Some(Command::IncreaseSharpness));
        assert_eq!(parse("sharp-"), Some(Command::DecreaseSharpness));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse("STOP"), Some(Command::Stop));
        assert_eq!(parse("G+"), Some(Command::IncreaseGain));
        assert_eq!(parse("Ev-"), Some(Command::DecreaseExposure));
        assert_eq!(parse("HdR"), Some(Command::ToggleHdr));
        assert_eq!(parse("SHARP+"), Some(Command::IncreaseSharpness));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse("  g+  "), Some(Command::IncreaseGain));
        assert_eq!(parse("\tstop\t"), Some(Command::Stop));
        // Lines arriving over CRLF keep their carriage return.
        assert_eq!(parse("ev+\r"), Some(Command::IncreaseExposure));
        assert_eq!(parse("sharp-\r"), Some(Command::DecreaseSharpness));
    }

    #[test]
    fn test_parse_unknown_keeps_raw_text() {
        assert_eq!(parse("foo"), Some(Command::Unknown("foo".to_string())));
        assert_eq!(parse("g++"), Some(Command::Unknown("g++".to_string())));
        // Raw text is trimmed but not lowercased.
        assert_eq!(parse(" FOO "), Some(Command::Unknown("FOO".to_string())));
    }

    #[test]
    fn test_parse_ignores_empty_lines() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("   "), None);
        assert_eq!(parse("\r"), None);
        assert_eq!(parse("\t  \t"), None);
    }
}
