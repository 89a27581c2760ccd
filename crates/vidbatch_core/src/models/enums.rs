//! Enumerations for batch configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where extracted entries and transcoded outputs are placed.
///
/// Exactly one policy governs a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    /// Keep the archive's directory layout under the output root.
    ///
    /// Every file entry is extracted. Candidates get a sibling output named
    /// `<stem>_<width>_<height>_<speed>.mp4`. Extracted inputs stay on disk.
    #[default]
    Mirrored,
    /// Drop the directory layout.
    ///
    /// Only candidates are extracted, to `<root>/<base name>`. The output is
    /// `<root>/output_<base name>` and the extracted input is deleted
    /// afterwards.
    Flat,
}

impl NamingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingPolicy::Mirrored => "mirrored",
            NamingPolicy::Flat => "flat",
        }
    }

    /// Whether extracted inputs are removed once transcoded.
    pub fn removes_intermediates(&self) -> bool {
        matches!(self, NamingPolicy::Flat)
    }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mirrored" | "mirror" => Ok(NamingPolicy::Mirrored),
            "flat" => Ok(NamingPolicy::Flat),
            other => Err(format!(
                "unknown naming policy '{}' (expected 'mirrored' or 'flat')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_policy_names() {
        assert_eq!("flat".parse::<NamingPolicy>().unwrap(), NamingPolicy::Flat);
        assert_eq!(
            "Mirrored".parse::<NamingPolicy>().unwrap(),
            NamingPolicy::Mirrored
        );
        assert!("nested".parse::<NamingPolicy>().is_err());
    }

    #[test]
    fn only_flat_removes_intermediates() {
        assert!(NamingPolicy::Flat.removes_intermediates());
        assert!(!NamingPolicy::Mirrored.removes_intermediates());
    }
}
