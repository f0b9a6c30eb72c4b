//! Turning a failed command's stderr into a web search link.

pub const DEFAULT_PROVIDER: &str = "you.com";

/// Which end of the output to start looking for a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanDirection {
    /// Last non-empty line; tracebacks put the actual error at the bottom.
    #[default]
    FromBottom,
    FromTop,
}

impl ScanDirection {
    pub fn from_bottom(from_bottom: bool) -> Self {
        if from_bottom {
            ScanDirection::FromBottom
        } else {
            ScanDirection::FromTop
        }
    }
}

/// Return the first non-empty line of `text` in scan order, or `""` when there is none.
///
/// Only `'\n'` separates lines, so a trailing `'\r'` stays part of its line.
pub fn extract_last_diagnostic_line(text: &str, direction: ScanDirection) -> &str {
    let mut lines = text.split('\n');
    let found = match direction {
        ScanDirection::FromBottom => lines.rev().find(|line| !line.is_empty()),
        ScanDirection::FromTop => lines.find(|line| !line.is_empty()),
    };
    found.unwrap_or("")
}

/// Percent-encode for a query parameter: unreserved characters pass, space becomes `+`.
pub fn quote_plus(text: &str) -> String {
    urlencoding::encode(text).replace("%20", "+")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEngine {
    host: String,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER)
    }
}

impl SearchEngine {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn url_for(&self, command_name: &str, stderr_text: &str, direction: ScanDirection) -> String {
        let line = extract_last_diagnostic_line(stderr_text, direction);
        let query = quote_plus(&format!("{} {}", command_name, line));
        format!("https://{}/search?q={}", self.host, query)
    }
}

/// Search link for the default provider, using the bottom-most stderr line.
pub fn build_search_url(command_name: &str, stderr_text: &str) -> String {
    SearchEngine::default().url_for(command_name, stderr_text, ScanDirection::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "line1\nline2\nline3";

    #[test]
    fn empty_text_yields_empty_line() {
        assert_eq!(extract_last_diagnostic_line("", ScanDirection::FromBottom), "");
        assert_eq!(extract_last_diagnostic_line("", ScanDirection::FromTop), "");
    }

    #[test]
    fn last_line_by_default() {
        assert_eq!(extract_last_diagnostic_line(TRACE, ScanDirection::default()), "line3");
    }

    #[test]
    fn first_line_when_scanning_from_top() {
        assert_eq!(extract_last_diagnostic_line(TRACE, ScanDirection::FromTop), "line1");
    }

    #[test]
    fn blank_lines_are_skipped() {
        let text = "\n\nTraceback:\n  File x\nValueError: bad\n\n";
        assert_eq!(extract_last_diagnostic_line(text, ScanDirection::FromBottom), "ValueError: bad");
        assert_eq!(extract_last_diagnostic_line(text, ScanDirection::FromTop), "Traceback:");
        assert_eq!(extract_last_diagnostic_line("\n\n\n", ScanDirection::FromBottom), "");
    }

    #[test]
    fn whitespace_only_lines_count_as_content() {
        assert_eq!(extract_last_diagnostic_line("err\n  \n", ScanDirection::FromBottom), "  ");
        assert_eq!(extract_last_diagnostic_line("err\r\n", ScanDirection::FromBottom), "err\r");
    }

    #[test]
    fn url_uses_quote_plus_encoding() {
        assert_eq!(
            build_search_url("cmd", "a/b c"),
            "https://you.com/search?q=cmd+a%2Fb+c"
        );
        assert_eq!(
            build_search_url("python3", "Traceback\nKeyError: 'x'\n"),
            "https://you.com/search?q=python3+KeyError%3A+%27x%27"
        );
    }

    #[test]
    fn empty_stderr_still_searches_for_the_command() {
        assert_eq!(build_search_url("make", ""), "https://you.com/search?q=make+");
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(quote_plus("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(quote_plus("ü"), "%C3%BC");
    }

    #[test]
    fn url_building_is_deterministic() {
        let first = build_search_url("cargo", "error[E0308]: mismatched types");
        let second = build_search_url("cargo", "error[E0308]: mismatched types");
        assert_eq!(first, second);
    }

    #[test]
    fn custom_provider_and_direction() {
        let engine = SearchEngine::new("duckduckgo.com");
        assert_eq!(
            engine.url_for("ls", "first\nsecond", ScanDirection::FromTop),
            "https://duckduckgo.com/search?q=ls+first"
        );
    }
}
