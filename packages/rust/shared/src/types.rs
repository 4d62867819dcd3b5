//! Core domain types for Rulebook documents.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulebookError};

// ---------------------------------------------------------------------------
// Impact
// ---------------------------------------------------------------------------

/// Severity classifier attached to each rule, drawn from a fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Impact {
    Critical,
    High,
    MediumHigh,
    Medium,
    LowMedium,
    Low,
}

impl Impact {
    /// All valid impact values, in severity order.
    pub const ALL: [Impact; 6] = [
        Impact::Critical,
        Impact::High,
        Impact::MediumHigh,
        Impact::Medium,
        Impact::LowMedium,
        Impact::Low,
    ];

    /// The canonical spelling used in rule front matter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Impact::Critical => "CRITICAL",
            Impact::High => "HIGH",
            Impact::MediumHigh => "MEDIUM-HIGH",
            Impact::Medium => "MEDIUM",
            Impact::LowMedium => "LOW-MEDIUM",
            Impact::Low => "LOW",
        }
    }

    /// Comma-separated list of all valid spellings, for diagnostics.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|i| i.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Impact {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Section taxonomy
// ---------------------------------------------------------------------------

/// One entry in the fixed section taxonomy.
///
/// Rules claim membership by file-name prefix; ordinals define document
/// order. The table is build-time configuration, not runtime input.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    /// File-name prefix that claims rules into this section.
    pub prefix: &'static str,
    /// Heading shown in the compiled document.
    pub name: &'static str,
    /// 1-based position in the document.
    pub ordinal: u32,
    /// Severity descriptor shown next to the section heading.
    pub impact_label: &'static str,
}

/// The declared section taxonomy, in document order.
pub const SECTIONS: [Section; 9] = [
    Section {
        prefix: "model-",
        name: "Data Modeling",
        ordinal: 1,
        impact_label: "CRITICAL",
    },
    Section {
        prefix: "partition-",
        name: "Partition Key Design",
        ordinal: 2,
        impact_label: "CRITICAL",
    },
    Section {
        prefix: "query-",
        name: "Query Optimization",
        ordinal: 3,
        impact_label: "HIGH",
    },
    Section {
        prefix: "sdk-",
        name: "SDK Best Practices",
        ordinal: 4,
        impact_label: "HIGH",
    },
    Section {
        prefix: "index-",
        name: "Indexing Strategies",
        ordinal: 5,
        impact_label: "MEDIUM-HIGH",
    },
    Section {
        prefix: "throughput-",
        name: "Throughput & Scaling",
        ordinal: 6,
        impact_label: "MEDIUM",
    },
    Section {
        prefix: "global-",
        name: "Global Distribution",
        ordinal: 7,
        impact_label: "MEDIUM",
    },
    Section {
        prefix: "monitoring-",
        name: "Monitoring & Diagnostics",
        ordinal: 8,
        impact_label: "LOW-MEDIUM",
    },
    Section {
        prefix: "pattern-",
        name: "Design Patterns",
        ordinal: 9,
        impact_label: "HIGH",
    },
];

// ---------------------------------------------------------------------------
// Fragment
// ---------------------------------------------------------------------------

/// One loaded rule file: front matter plus an opaque markdown body.
///
/// The metadata map is kept untyped so the validator can report every
/// missing or invalid key instead of failing on the first one.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Stable identifier derived from the file stem (e.g. `model-embed-data`).
    pub id: String,
    /// Parsed front matter, key to JSON value.
    pub meta: BTreeMap<String, serde_json::Value>,
    /// Everything after the closing front matter delimiter, end-trimmed.
    pub body: String,
}

impl Fragment {
    /// The `title` field, if present as a string.
    pub fn title(&self) -> Option<&str> {
        self.meta.get("title").and_then(|v| v.as_str())
    }

    /// The raw `impact` field, if present as a string.
    pub fn impact(&self) -> Option<&str> {
        self.meta.get("impact").and_then(|v| v.as_str())
    }

    /// The `impactDescription` field, if present as a string.
    pub fn impact_description(&self) -> Option<&str> {
        self.meta.get("impactDescription").and_then(|v| v.as_str())
    }

    /// The `tags` field, if present as an array.
    pub fn tags(&self) -> Option<&Vec<serde_json::Value>> {
        self.meta.get("tags").and_then(|v| v.as_array())
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// The `manifest.json` record consumed verbatim by the document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Document title.
    pub title: String,
    /// Version string shown in the header.
    pub version: String,
    /// Organization line shown in the header.
    pub organization: String,
    /// Date line shown in the header (verbatim text, not parsed).
    pub date: String,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Optional note rendered as a blockquote under the header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Links rendered as the trailing references block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<Reference>,
}

/// A single entry in the references block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    /// Display name of the link.
    pub name: String,
    /// Target URL.
    pub url: String,
}

impl Manifest {
    /// Load and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Manifest> {
        let content =
            std::fs::read_to_string(path).map_err(|e| RulebookError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| {
            RulebookError::manifest(format!("failed to parse {}: {e}", path.display()))
        })
    }
}
