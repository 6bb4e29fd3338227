//! Build metadata
//!
//! Build number and timestamp come from build.rs through `NUTRITRACK_BUILD_*` env vars.

use std::fmt;

use serde::Serialize;

/// Build number, incremented on each recompilation (0 when built without build.rs output)
pub const BUILD_NUMBER: u64 = digits_or_zero(option_env!("NUTRITRACK_BUILD_NUMBER"));

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRITRACK_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `str::parse` is not const; anything but plain ASCII digits yields 0
const fn digits_or_zero(value: Option<&str>) -> u64 {
    let bytes = match value {
        Some(s) => s.as_bytes(),
        None => return 0,
    };
    let mut n: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            return 0;
        }
        n = n * 10 + (bytes[i] - b'0') as u64;
        i += 1;
    }
    n
}

/// Build metadata, embedded in the status report
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NutriTrack v{} (build {}, {})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Startup banner on stderr; stdout carries the MCP transport
pub fn print_startup_banner() {
    let line = "=".repeat(47);
    eprintln!("{}\n  {}\n{}", line, BuildInfo::current(), line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_or_zero() {
        assert_eq!(digits_or_zero(Some("42")), 42);
        assert_eq!(digits_or_zero(Some("")), 0);
        assert_eq!(digits_or_zero(Some("12a")), 0);
        assert_eq!(digits_or_zero(None), 0);
    }

    #[test]
    fn test_display_names_version_and_build() {
        let info = BuildInfo { version: "1.2.3", build_number: 7, build_timestamp: "2026-10-19T00:00:00Z" };
        assert_eq!(info.to_string(), "NutriTrack v1.2.3 (build 7, 2026-10-19T00:00:00Z)");
    }

    #[test]
    fn test_current_uses_package_version() {
        assert_eq!(BuildInfo::current().version, env!("CARGO_PKG_VERSION"));
    }
}
