//! Edition and bitness classification from the compiler banner.

use std::fmt;

/// Substring of the banner identifying the 64-bit compiler.
pub const BITNESS_MARKER: &str = "64-bit";

/// Capability tier of an Excelsior JET installation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Edition {
    Evaluation,
    Standard,
    Professional,
    Enterprise,
    Embedded,
    EmbeddedEvaluation,
}

impl Edition {
    /// Banner matching order. Longer display names come first so that
    /// "Embedded Evaluation" never classifies as plain "Evaluation".
    const MATCH_ORDER: [Edition; 6] = [
        Edition::EmbeddedEvaluation,
        Edition::Embedded,
        Edition::Evaluation,
        Edition::Standard,
        Edition::Professional,
        Edition::Enterprise,
    ];

    /// Name the compiler prints in its banner.
    pub const fn display_name(self) -> &'static str {
        match self {
            Edition::Evaluation => "Evaluation",
            Edition::Standard => "Standard Edition",
            Edition::Professional => "Professional Edition",
            Edition::Enterprise => "Enterprise Edition",
            Edition::Embedded => "Embedded Edition",
            Edition::EmbeddedEvaluation => "Embedded Evaluation",
        }
    }

    pub const fn is_embedded(self) -> bool {
        matches!(self, Edition::Embedded | Edition::EmbeddedEvaluation)
    }

    /// Classify a single banner line.
    pub fn from_banner_line(line: &str) -> Option<Edition> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|edition| line.contains(edition.display_name()))
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lazily detected half of a toolchain installation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub edition: Edition,
    pub is_64_bit: bool,
}

/// Find the first banner line naming an edition.
///
/// Returns `None` when no line matches; callers treat that as a hard failure.
pub fn parse_banner<'a, I>(lines: I) -> Option<Capabilities>
where
    I: IntoIterator<Item = &'a str>,
{
    lines.into_iter().find_map(|line| {
        Edition::from_banner_line(line).map(|edition| Capabilities {
            edition,
            is_64_bit: line.contains(BITNESS_MARKER),
        })
    })
}
