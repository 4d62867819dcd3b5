//! Document rendering.
//!
//! Deterministic text concatenation: header, abstract, TOC, numbered
//! sections with verbatim rule bodies, then the references block.
//! Re-rendering unchanged input yields byte-identical output.

use rulebook_shared::Manifest;

use crate::classify::SectionGroup;
use crate::toc::Toc;

/// Render the complete document.
///
/// Rule bodies are included verbatim; authors fully control their own
/// formatting. Metadata missing from an invalid-but-parseable rule renders
/// as empty text, since the compile flow does not re-run schema checks.
pub fn render(manifest: &Manifest, groups: &[SectionGroup], toc: &Toc) -> String {
    let mut out = String::new();

    // Header. The trailing double spaces are markdown hard line breaks.
    out.push_str(&format!("# {}\n\n", manifest.title));
    out.push_str(&format!("**Version {}**  \n", manifest.version));
    out.push_str(&format!("{}  \n", manifest.organization));
    out.push_str(&format!("{}\n\n", manifest.date));

    if let Some(note) = &manifest.note {
        let formatted = note.lines().collect::<Vec<_>>().join("  \n> ");
        out.push_str(&format!("> **Note:**  \n> {formatted}\n\n"));
    }

    out.push_str("---\n\n");

    out.push_str("## Abstract\n\n");
    out.push_str(&format!("{}\n\n", manifest.abstract_text));
    out.push_str("---\n\n");

    out.push_str("## Table of Contents\n\n");
    for section in &toc.sections {
        out.push_str(&format!(
            "{}. [{}](#{}) — **{}**\n",
            section.number, section.title, section.anchor, section.impact_label
        ));
        for item in &section.items {
            out.push_str(&format!(
                "   - {} [{}](#{})\n",
                item.number, item.title, item.anchor
            ));
        }
    }
    out.push_str("\n---\n\n");

    for group in groups {
        let section = group.section;
        out.push_str(&format!("## {}. {}\n\n", section.ordinal, section.name));
        out.push_str(&format!("**Impact: {}**\n\n", section.impact_label));

        for (index, fragment) in group.fragments.iter().enumerate() {
            out.push_str(&format!(
                "### {}.{} {}\n\n",
                section.ordinal,
                index + 1,
                fragment.title().unwrap_or_default()
            ));
            out.push_str(&format!(
                "**Impact: {}** ({})\n\n",
                fragment.impact().unwrap_or_default(),
                fragment.impact_description().unwrap_or_default()
            ));
            out.push_str(fragment.body.trim());
            out.push_str("\n\n");
        }

        out.push_str("---\n\n");
    }

    out.push_str("## References\n");
    if !manifest.references.is_empty() {
        out.push('\n');
        for reference in &manifest.references {
            out.push_str(&format!("- [{}]({})\n", reference.name, reference.url));
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
