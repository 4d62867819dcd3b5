//! The two entry flows: `compile` and `validate`.
//!
//! Compilation is fail-fast on malformed rules (a partial document is
//! never written); validation scans the whole corpus and aggregates every
//! violation before deciding overall success. The flows share the loader
//! and nothing else, so the policies cannot leak into each other.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use rulebook_shared::{Manifest, Result, RulebookError};

use crate::{classify, loader, render, toc};

// ---------------------------------------------------------------------------
// Compile flow
// ---------------------------------------------------------------------------

/// Configuration for the `compile` flow.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// Directory containing the rule files.
    pub rules_dir: PathBuf,
    /// Manifest consumed by the document header and references block.
    pub manifest_path: PathBuf,
    /// Output file, fully overwritten on success.
    pub output_path: PathBuf,
}

/// Result of the `compile` flow.
#[derive(Debug)]
pub struct CompileResult {
    /// Where the document was written.
    pub output_path: PathBuf,
    /// Rules included in the document (unclassified rules excluded).
    pub rule_count: usize,
    /// Declared sections rendered.
    pub section_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a rule file is loaded.
    fn rule_loaded(&self, id: &str, current: usize, total: usize);
    /// Called when the flow completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn rule_loaded(&self, _id: &str, _current: usize, _total: usize) {}
    fn done(&self) {}
}

/// Run the full compile flow.
///
/// 1. Load the manifest
/// 2. Load every rule file (fail-fast on a malformed one)
/// 3. Classify into the declared sections
/// 4. Derive the table of contents
/// 5. Render and atomically overwrite the output file
#[instrument(skip_all, fields(rules_dir = %config.rules_dir.display()))]
pub fn compile(
    config: &CompileConfig,
    progress: &dyn ProgressReporter,
) -> Result<CompileResult> {
    let start = Instant::now();

    progress.phase("Loading manifest");
    let manifest = Manifest::load(&config.manifest_path)?;

    progress.phase("Loading rules");
    let paths = loader::discover(&config.rules_dir)?;
    let total = paths.len();
    let mut fragments = Vec::with_capacity(total);
    for (i, path) in paths.iter().enumerate() {
        let fragment = loader::load(path)?;
        progress.rule_loaded(&fragment.id, i + 1, total);
        fragments.push(fragment);
    }

    progress.phase("Classifying sections");
    let groups = classify::classify(fragments);
    let rule_count = groups.iter().map(|g| g.fragments.len()).sum();

    progress.phase("Building table of contents");
    let toc = toc::build_toc(&groups);

    progress.phase("Rendering document");
    let document = render::render(&manifest, &groups, &toc);
    write_atomic(&config.output_path, &document)?;

    progress.done();

    info!(
        rules = rule_count,
        output = %config.output_path.display(),
        "compile complete"
    );

    Ok(CompileResult {
        output_path: config.output_path.clone(),
        rule_count,
        section_count: groups.len(),
        elapsed: start.elapsed(),
    })
}

/// Write the document as an atomic full overwrite (temp file + rename),
/// so a consumer never observes a partial document.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            RulebookError::config(format!("invalid output path: {}", path.display()))
        })?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| RulebookError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| RulebookError::io(path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "wrote document");
    Ok(())
}

// ---------------------------------------------------------------------------
// Validate flow
// ---------------------------------------------------------------------------

/// Configuration for the `validate` flow.
#[derive(Debug, Clone)]
pub struct ValidateConfig {
    /// Directory containing the rule files.
    pub rules_dir: PathBuf,
}

/// Validation outcome for one failing rule file.
#[derive(Debug, Clone)]
pub struct FragmentReport {
    /// Rule identifier (file stem).
    pub id: String,
    /// Every violation found, in check order.
    pub violations: Vec<String>,
}

/// Aggregated outcome of a full-corpus validation scan.
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// One entry per failing rule, in scan order.
    pub failures: Vec<FragmentReport>,
    /// Rules that passed every check.
    pub validated_count: usize,
    /// Total violations across the corpus.
    pub violation_count: usize,
}

impl ValidationReport {
    /// True when any rule failed any check.
    pub fn has_failures(&self) -> bool {
        self.violation_count > 0
    }
}

/// Run the full-corpus validation scan.
///
/// Every rule file is checked regardless of earlier failures. A rule whose
/// front matter cannot be parsed at all is reported alongside the schema
/// violations and never aborts the scan.
#[instrument(skip_all, fields(rules_dir = %config.rules_dir.display()))]
pub fn validate(config: &ValidateConfig) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();

    for (id, loaded) in loader::load_each(&config.rules_dir)? {
        match loaded {
            Ok(fragment) => {
                let violations = crate::validate::validate_fragment(&fragment);
                if violations.is_empty() {
                    report.validated_count += 1;
                } else {
                    report.violation_count += violations.len();
                    report.failures.push(FragmentReport { id, violations });
                }
            }
            Err(e) => {
                report.violation_count += 1;
                report.failures.push(FragmentReport {
                    id,
                    violations: vec![e.to_string()],
                });
            }
        }
    }

    info!(
        validated = report.validated_count,
        violations = report.violation_count,
        "validation scan complete"
    );

    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "rulebook-pipeline-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_manifest(dir: &Path) -> PathBuf {
        let path = dir.join("manifest.json");
        std::fs::write(
            &path,
            r#"{
  "title": "Example Best Practices",
  "version": "1.0",
  "organization": "Example Org",
  "date": "January 2025",
  "abstract": "A compiled reference.",
  "references": [{ "name": "Docs", "url": "https://example.com/docs" }]
}"#,
        )
        .unwrap();
        path
    }

    fn rule(title: &str, impact: &str) -> String {
        format!(
            "---\ntitle: {title}\nimpact: {impact}\nimpactDescription: it matters\ntags:\n  - example\n---\n\n\
             **Incorrect:**\n\n```\nbad\n```\n\n**Correct:**\n\n```\ngood\n```\n"
        )
    }

    fn setup_corpus(dir: &Path) {
        std::fs::write(dir.join("model-b-two.md"), rule("Rule B", "HIGH")).unwrap();
        std::fs::write(dir.join("model-a-one.md"), rule("Rule A", "CRITICAL")).unwrap();
        std::fs::write(dir.join("partition-keys.md"), rule("Pick good keys", "CRITICAL")).unwrap();
        std::fs::write(dir.join("_template.md"), "not even front matter").unwrap();
    }

    fn compile_config(tmp: &Path) -> CompileConfig {
        CompileConfig {
            rules_dir: tmp.join("rules"),
            manifest_path: tmp.join("manifest.json"),
            output_path: tmp.join("AGENTS.md"),
        }
    }

    #[test]
    fn compile_end_to_end() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        write_manifest(&tmp);
        setup_corpus(&rules);

        let result = compile(&compile_config(&tmp), &SilentProgress).unwrap();
        assert_eq!(result.rule_count, 3);
        assert_eq!(result.section_count, 9);

        let doc = std::fs::read_to_string(&result.output_path).unwrap();

        // TOC order: section 1 with nested 1.1/1.2, then section 2 with 2.1.
        let toc_1 = doc.find("1. [Data Modeling](#1-data-modeling)").unwrap();
        let toc_11 = doc.find("   - 1.1 [Rule A](#11-rule-a)").unwrap();
        let toc_12 = doc.find("   - 1.2 [Rule B](#12-rule-b)").unwrap();
        let toc_2 = doc.find("2. [Partition Key Design](#2-partition-key-design)").unwrap();
        let toc_21 = doc.find("   - 2.1 [Pick good keys]").unwrap();
        assert!(toc_1 < toc_11 && toc_11 < toc_12 && toc_12 < toc_2 && toc_2 < toc_21);

        // Headings use the same numbering.
        assert!(doc.contains("### 1.1 Rule A"));
        assert!(doc.contains("### 1.2 Rule B"));
        assert!(doc.contains("### 2.1 Pick good keys"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_is_byte_identical_across_runs() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        write_manifest(&tmp);
        setup_corpus(&rules);
        let config = compile_config(&tmp);

        compile(&config, &SilentProgress).unwrap();
        let first = std::fs::read(&config.output_path).unwrap();

        compile(&config, &SilentProgress).unwrap();
        let second = std::fs::read(&config.output_path).unwrap();

        assert_eq!(first, second);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_aborts_on_malformed_rule() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        write_manifest(&tmp);
        setup_corpus(&rules);
        std::fs::write(rules.join("query-broken.md"), "no front matter here\n").unwrap();

        let config = compile_config(&tmp);
        let err = compile(&config, &SilentProgress).unwrap_err();
        assert!(matches!(err, RulebookError::MalformedFragment { .. }));
        // Fail-fast: nothing was written.
        assert!(!config.output_path.exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_excludes_unclassified_rules() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        write_manifest(&tmp);
        setup_corpus(&rules);
        std::fs::write(rules.join("zzz-custom.md"), rule("Orphan rule", "LOW")).unwrap();

        let result = compile(&compile_config(&tmp), &SilentProgress).unwrap();
        assert_eq!(result.rule_count, 3);

        let doc = std::fs::read_to_string(&result.output_path).unwrap();
        assert!(!doc.contains("Orphan rule"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_an_invalid_but_parseable_rule() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        write_manifest(&tmp);
        // Parseable front matter, but fails the schema (no impact, no markers).
        std::fs::write(rules.join("model-thin.md"), "---\ntitle: Thin rule\n---\nprose\n")
            .unwrap();

        let result = compile(&compile_config(&tmp), &SilentProgress).unwrap();
        assert_eq!(result.rule_count, 1);

        let doc = std::fs::read_to_string(&result.output_path).unwrap();
        assert!(doc.contains("### 1.1 Thin rule"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn validate_reports_every_failing_rule() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        setup_corpus(&rules);
        // One schema-invalid rule, one malformed rule, one unclassified-but-valid rule.
        std::fs::write(
            rules.join("model-thin.md"),
            "---\ntitle: Thin rule\n---\nprose\n",
        )
        .unwrap();
        std::fs::write(rules.join("query-broken.md"), "no front matter here\n").unwrap();
        std::fs::write(rules.join("zzz-custom.md"), rule("Orphan rule", "LOW")).unwrap();

        let report = validate(&ValidateConfig {
            rules_dir: rules.clone(),
        })
        .unwrap();

        assert!(report.has_failures());
        // The orphan rule participates in validation even though compile drops it.
        assert_eq!(report.validated_count, 4);
        assert_eq!(report.failures.len(), 2);

        let thin = report.failures.iter().find(|f| f.id == "model-thin").unwrap();
        assert_eq!(thin.violations.len(), 6);
        let broken = report
            .failures
            .iter()
            .find(|f| f.id == "query-broken")
            .unwrap();
        assert!(broken.violations[0].contains("front matter"));

        assert_eq!(report.violation_count, 7);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn validate_clean_corpus_has_no_failures() {
        let tmp = temp_dir();
        let rules = tmp.join("rules");
        std::fs::create_dir_all(&rules).unwrap();
        setup_corpus(&rules);

        let report = validate(&ValidateConfig {
            rules_dir: rules.clone(),
        })
        .unwrap();

        assert!(!report.has_failures());
        assert_eq!(report.validated_count, 3);
        assert!(report.failures.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn compile_fixture_corpus() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures");
        let tmp = temp_dir();

        let config = CompileConfig {
            rules_dir: fixtures.join("rules"),
            manifest_path: fixtures.join("manifest.json"),
            output_path: tmp.join("AGENTS.md"),
        };

        let result = compile(&config, &SilentProgress).unwrap();
        assert!(result.rule_count >= 3);

        let doc = std::fs::read_to_string(&result.output_path).unwrap();
        assert!(doc.contains("## Table of Contents"));
        assert!(doc.contains("## References"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
