//! Response handling
//!
//! Defines response codes and formatting.

/// Response codes
pub const BOOLEAN_RESULT: u16 = 200;
pub const GOODBYE: u16 = 221;
pub const ACTION_OK: u16 = 250;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const REQUEST_REJECTED: u16 = 450;
pub const VALIDATION_FAILED: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const FILESYSTEM_ERROR: u16 = 550;

/// Format a response line. Embedded line breaks, e.g. from resolver output,
/// are folded so every response stays a single line.
pub fn format_response(code: u16, message: &str) -> String {
    let message: String = message
        .trim()
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    format!("{} {}\r\n", code, message)
}

pub fn boolean(value: bool) -> String {
    format_response(BOOLEAN_RESULT, if value { "true" } else { "false" })
}

pub fn ok() -> String {
    format_response(ACTION_OK, "OK")
}

/// Splits a response line into its code and message.
pub fn parse_response(line: &str) -> Option<(u16, &str)> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (code, message) = line.split_once(' ').unwrap_or((line, ""));
    code.parse().ok().map(|code| (code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_messages_are_folded() {
        assert_eq!(
            format_response(451, "exit 1, returned output: a\r\nb\n"),
            "451 exit 1, returned output: a  b\r\n"
        );
    }

    #[test]
    fn parse_response_splits_code() {
        assert_eq!(parse_response("200 true\r\n"), Some((200, "true")));
        assert_eq!(parse_response("250 OK"), Some((250, "OK")));
        assert_eq!(parse_response("garbage"), None);
    }
}
