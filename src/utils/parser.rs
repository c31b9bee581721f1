//! Text extraction from child process output.

use regex::Regex;
use std::sync::OnceLock;

fn ansi_regex() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    // 7-bit C1 escapes and CSI sequences (parameter, intermediate, final bytes).
    ANSI.get_or_init(|| {
        Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern is valid")
    })
}

fn port_regex() -> &'static Regex {
    static PORT: OnceLock<Regex> = OnceLock::new();
    PORT.get_or_init(|| {
        Regex::new(r"(?:localhost|127\.0\.0\.1|0\.0\.0\.0):(\d{1,5})").expect("port pattern is valid")
    })
}

fn version_regex() -> &'static Regex {
    static VERSION: OnceLock<Regex> = OnceLock::new();
    VERSION.get_or_init(|| Regex::new(r"v?(\d+\.\d+\.\d+)").expect("version pattern is valid"))
}

/// Remove terminal escape sequences (colors, cursor movement).
pub fn strip_ansi(text: &str) -> String {
    ansi_regex().replace_all(text, "").into_owned()
}

/// Port of a local URL in a dev server banner (`- Local: http://localhost:3001`).
pub fn extract_port(line: &str) -> Option<u16> {
    port_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// First dotted version number in `--version` output (`v20.11.1`, `9.6.0`).
pub fn extract_version(output: &str) -> Option<String> {
    version_regex()
        .captures(output.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
