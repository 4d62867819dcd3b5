//! Section classification.
//!
//! Assigns each loaded rule to the first declared section whose prefix
//! matches its identifier and fixes the intra-section ordering.

use tracing::warn;

use rulebook_shared::{Fragment, SECTIONS, Section};

/// A declared section together with its claimed rules, in render order.
#[derive(Debug, Clone)]
pub struct SectionGroup {
    /// The taxonomy entry.
    pub section: Section,
    /// Claimed rules, sorted lexicographically by identifier.
    pub fragments: Vec<Fragment>,
}

/// Group fragments into the declared sections.
///
/// Sections come back in ordinal order and every declared section is
/// present, empty or not. A fragment matching no declared prefix is
/// excluded from the compiled document; the omission is silent in the
/// output, so it is logged here instead.
pub fn classify(fragments: Vec<Fragment>) -> Vec<SectionGroup> {
    let mut groups: Vec<SectionGroup> = SECTIONS
        .iter()
        .map(|&section| SectionGroup {
            section,
            fragments: Vec::new(),
        })
        .collect();

    for fragment in fragments {
        match groups
            .iter_mut()
            .find(|g| fragment.id.starts_with(g.section.prefix))
        {
            Some(group) => group.fragments.push(fragment),
            None => warn!(
                id = %fragment.id,
                "rule matches no declared section prefix, excluded from compiled output"
            ),
        }
    }

    for group in &mut groups {
        group.fragments.sort_by(|a, b| a.id.cmp(&b.id));
    }

    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
