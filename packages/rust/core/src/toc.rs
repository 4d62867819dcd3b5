//! Table of contents builder.
//!
//! Derives the numbered, anchor-linked outline from the classified rule
//! groups. The outline and the rendered headings are both driven by the
//! same group list, so TOC entry `S.I` always points at heading `S.I`.

use std::sync::LazyLock;

use regex::Regex;

use crate::classify::SectionGroup;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The derived outline for the whole document.
#[derive(Debug, Clone)]
pub struct Toc {
    /// One entry per declared section, in ordinal order.
    pub sections: Vec<TocSection>,
}

/// One section entry in the outline.
#[derive(Debug, Clone)]
pub struct TocSection {
    /// Section ordinal (1-based).
    pub number: u32,
    /// Section display name.
    pub title: String,
    /// Full anchor target, e.g. `1-data-modeling`.
    pub anchor: String,
    /// Severity descriptor shown next to the entry.
    pub impact_label: String,
    /// Nested rule entries, in intra-section order.
    pub items: Vec<TocItem>,
}

/// One rule entry nested under a section.
#[derive(Debug, Clone)]
pub struct TocItem {
    /// Dotted number, e.g. `1.2`.
    pub number: String,
    /// Rule title from its metadata.
    pub title: String,
    /// Full anchor target with the dot dropped, e.g. `12-use-point-reads`.
    pub anchor: String,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Turn heading text into an anchor slug: lowercase, every run of
/// non-alphanumeric characters collapsed to a single dash.
pub fn anchor(text: &str) -> String {
    NON_ALPHANUMERIC
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// Build the outline from classified groups.
///
/// A rule missing its title contributes an entry with empty text; the
/// compile flow does not re-run schema checks.
pub fn build_toc(groups: &[SectionGroup]) -> Toc {
    let sections = groups
        .iter()
        .map(|group| {
            let section = group.section;
            let items = group
                .fragments
                .iter()
                .enumerate()
                .map(|(index, fragment)| {
                    let title = fragment.title().unwrap_or_default().to_string();
                    TocItem {
                        number: format!("{}.{}", section.ordinal, index + 1),
                        anchor: format!("{}{}-{}", section.ordinal, index + 1, anchor(&title)),
                        title,
                    }
                })
                .collect();

            TocSection {
                number: section.ordinal,
                title: section.name.to_string(),
                anchor: format!("{}-{}", section.ordinal, anchor(section.name)),
                impact_label: section.impact_label.to_string(),
                items,
            }
        })
        .collect();

    Toc { sections }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
