//! Rule file loading.
//!
//! Reads a rule file and splits it into a front matter mapping plus an
//! opaque markdown body. The body is never reformatted; markup inside it
//! belongs to the rule author.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use rulebook_shared::{Fragment, Result, RulebookError};

/// List rule files under `rules_dir`, sorted by file name.
///
/// Only `*.md` files are considered; names starting with `_` (templates,
/// section notes) are skipped. The sort keeps enumeration stable across
/// runs regardless of directory order.
pub fn discover(rules_dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(rules_dir).map_err(|e| RulebookError::io(rules_dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RulebookError::io(rules_dir, e))?;
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if stem.starts_with('_') {
            continue;
        }

        paths.push(path);
    }

    paths.sort();
    debug!(count = paths.len(), dir = %rules_dir.display(), "discovered rule files");
    Ok(paths)
}

/// Derive a fragment identifier from its file path (the file stem).
pub fn fragment_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load a single rule file into a [`Fragment`].
///
/// Fails with [`RulebookError::MalformedFragment`] when the front matter
/// block is absent or does not parse as a key-value mapping. On success the
/// body is the remainder verbatim, trimmed at the extremities only.
pub fn load(path: &Path) -> Result<Fragment> {
    let id = fragment_id(path);
    let content = std::fs::read_to_string(path).map_err(|e| RulebookError::io(path, e))?;

    let (raw_meta, body) = split_front_matter(&content)
        .ok_or_else(|| RulebookError::malformed(&id, "missing front matter block"))?;
    let meta = parse_front_matter(raw_meta).map_err(|e| RulebookError::malformed(&id, e))?;

    Ok(Fragment {
        id,
        meta,
        body: body.trim().to_string(),
    })
}

/// Load every rule file under `rules_dir`, failing on the first malformed one.
///
/// This is the compile path; a partial document is never produced.
pub fn load_all(rules_dir: &Path) -> Result<Vec<Fragment>> {
    discover(rules_dir)?.iter().map(|p| load(p)).collect()
}

/// Load every rule file under `rules_dir`, yielding one result per file.
///
/// This is the validation path, which never stops at the first failure.
pub fn load_each(rules_dir: &Path) -> Result<Vec<(String, Result<Fragment>)>> {
    let paths = discover(rules_dir)?;
    Ok(paths
        .iter()
        .map(|p| (fragment_id(p), load(p)))
        .collect())
}

// ---------------------------------------------------------------------------
// Front matter
// ---------------------------------------------------------------------------

/// Split `input` into its front matter block and the remaining body.
///
/// The block must open with `---` on the first line (an optional BOM is
/// tolerated) and close with `---` or `...` on its own line. Returns `None`
/// when no such block exists.
fn split_front_matter(input: &str) -> Option<(&str, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let rest = input.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a front matter block into a string-to-JSON map.
///
/// Parses with serde_yaml, then converts to `serde_json::Value` for uniform
/// downstream handling.
fn parse_front_matter(raw: &str) -> std::result::Result<BTreeMap<String, Value>, String> {
    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(raw).map_err(|e| format!("invalid front matter: {e}"))?;
    let json_value: Value = serde_json::to_value(yaml_value)
        .map_err(|e| format!("invalid front matter: {e}"))?;

    match json_value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err("front matter is not a key-value mapping".into()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
