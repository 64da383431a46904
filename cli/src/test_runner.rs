use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use render::{Format, RenderError, RenderOptions};

const FIXTURE_SUFFIX: &str = ".test.md";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Output format name. Defaults to "html".
    #[serde(default)]
    pub format: Option<String>,

    /// Nesting limit. Defaults to the parser's default.
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Fail on over-deep nesting instead of degrading it to text.
    #[serde(default)]
    pub strict: bool,

    /// Expected rendered output (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// If true, the test expects strict parsing to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// 1-based line the parse error must point at. Implies `expect_parse_error`.
    #[serde(default)]
    pub expect_error_line: Option<usize>,
}

impl TestConfig {
    fn options(&self) -> Result<RenderOptions, String> {
        let mut options = RenderOptions {
            strict: self.strict,
            ..RenderOptions::default()
        };
        if let Some(format) = &self.format {
            options.format = format.parse::<Format>()?;
        }
        if let Some(max_depth) = self.max_depth {
            options.max_depth = max_depth;
        }
        Ok(options)
    }

    fn expects_parse_error(&self) -> bool {
        self.expect_parse_error || self.expect_error_line.is_some()
    }
}

/// Split a `.test.md` file into its TOML config and the document.
///
/// The line ending that closes the file belongs to the fixture, not to the
/// document, and is dropped.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = strip_line_ending_prefix(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let document = strip_line_ending_prefix(&after_open[close_pos + 4..]);
    let document = document
        .strip_suffix('\n')
        .map(|d| d.strip_suffix('\r').unwrap_or(d))
        .unwrap_or(document);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, document))
}

fn strip_line_ending_prefix(text: &str) -> &str {
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.trim_end_matches(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    debug!(path = %path.display(), "running fixture");
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, document) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };
    let description = config.description.clone();

    let options = match config.options() {
        Ok(options) => options,
        Err(e) => return fail(description, format!("frontmatter error: {}", e)),
    };

    let mut output_buf = Vec::new();
    let result = render::render_to(document, 0, &options, &mut output_buf);
    let actual = String::from_utf8_lossy(&output_buf);

    let failure = if config.expects_parse_error() {
        check_parse_error(&config, document, result)
    } else {
        check_output(&config, result, actual.trim())
    };

    match failure {
        Some(reason) => fail(description, reason),
        None => TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        },
    }
}

/// Returns `Some(reason)` when the render did not fail the way `config` expects.
fn check_parse_error(
    config: &TestConfig,
    document: &str,
    result: Result<(), RenderError>,
) -> Option<String> {
    let error = match result {
        Err(RenderError::Parse(error)) => error,
        Err(other) => return Some(format!("expected parse error, got: {}", other)),
        Ok(()) => return Some("expected parse error, but parsing succeeded".into()),
    };

    let expected_line = config.expect_error_line?;
    let actual_line = byte_offset_to_line(document, error.span.start);
    (actual_line != expected_line).then(|| {
        format!(
            "expected parse error on line {}, but span is on line {}",
            expected_line, actual_line
        )
    })
}

/// Returns `Some(reason)` when the render failed or produced other output.
fn check_output(
    config: &TestConfig,
    result: Result<(), RenderError>,
    actual: &str,
) -> Option<String> {
    if let Err(error) = result {
        return Some(format!("unexpected error: {}", error));
    }

    let expected = config.expect_output.as_deref()?.trim();
    (actual != expected).then(|| {
        format!(
            "output mismatch\n  expected: {}\n  actual:   {}",
            expected, actual
        )
    })
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Discover fixtures grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_tests(&path, root, out);
            continue;
        }
        let is_fixture = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX));
        if is_fixture {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// Keep only the requested categories and their subcategories.
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let request = request.trim_matches('/');
        let prefix = format!("{}/", request);
        let before = selected.len();
        for (category, files) in all {
            if category == request || category.starts_with(&prefix) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                request,
                available.join(", ")
            );
        }
    }
    selected
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// ANSI styling for the report, or none of it.
struct Palette {
    color: bool,
}

impl Palette {
    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn pass(&self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(&self) -> String {
        self.paint("31", "FAIL")
    }

    fn heading(&self, text: &str) -> String {
        self.paint("1", text)
    }
}

/// Run every fixture under `path` (or a single file).
/// If `categories` is non-empty, only run fixtures in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let palette = Palette { color: !no_color };

    let all_categories = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover_categorized(path)
    };

    if all_categories.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let selected = select_categories(&all_categories, categories);
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &selected {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", palette.heading(category_label(category)));
        }

        for file in files.iter() {
            let result = run_single_test(file);
            match result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", palette.pass(), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", palette.fail(), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", palette.paint("32", "ok"), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            palette.paint("31", "FAILED"),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn assert_pass(result: &TestResult) {
        if let TestOutcome::Fail(reason) = &result.outcome {
            panic!("{} failed: {}", result.path.display(), reason);
        }
    }

    fn failure_reason(result: TestResult) -> String {
        match result.outcome {
            TestOutcome::Fail(reason) => reason,
            TestOutcome::Pass => panic!("{} unexpectedly passed", result.path.display()),
        }
    }

    #[test]
    fn splits_frontmatter_from_document() {
        let (config, document) = parse_test_file(
            "---\r\ndescription = \"d\"\r\nformat = \"text\"\r\n---\r\n**a**\r\n",
        )
        .unwrap();
        assert_eq!(config.description.as_deref(), Some("d"));
        assert_eq!(config.format.as_deref(), Some("text"));
        assert_eq!(document, "**a**");
    }

    #[test]
    fn rejects_malformed_frontmatter() {
        assert!(parse_test_file("no frontmatter").is_err());
        assert!(parse_test_file("---\ndescription = \"d\"\n").is_err());
        assert!(parse_test_file("---\nunknown_key = 1\n---\nx").is_err());
    }

    #[test]
    fn counts_lines_from_one() {
        assert_eq!(byte_offset_to_line("a\nb\nc", 0), 1);
        assert_eq!(byte_offset_to_line("a\nb\nc", 2), 2);
        assert_eq!(byte_offset_to_line("a\nb\nc", 99), 3);
    }

    #[test]
    fn fixture_suite_passes() {
        let root = fixtures_dir();
        for files in discover_categorized(&root).values() {
            for file in files {
                assert_pass(&run_single_test(file));
            }
        }
        assert_eq!(run_tests(&root, true, &[]), 0);
    }

    #[test]
    fn discovers_categories() {
        let categories = discover_categorized(&fixtures_dir());
        for expected in ["inline", "links", "nesting", "paragraphs"] {
            assert!(categories.contains_key(expected), "missing {}", expected);
        }
        let selected = select_categories(&categories, &["links/".to_string()]);
        assert_eq!(selected.keys().copied().collect::<Vec<_>>(), vec!["links"]);
    }

    #[test]
    fn reports_output_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            dir.path(),
            "wrong.test.md",
            "---\nexpect_output = \"<em>a</em>\"\n---\n**a**\n",
        );
        let reason = failure_reason(run_single_test(&path));
        assert!(reason.contains("<strong>a</strong>"), "{}", reason);
        assert_eq!(run_tests(&path, true, &[]), 1);
    }

    #[test]
    fn checks_parse_error_line() {
        let dir = tempfile::tempdir().unwrap();
        let source = "first\n\n**a *b* c**";
        let right = write_fixture(
            dir.path(),
            "right.test.md",
            &format!("---\nmax_depth = 1\nstrict = true\nexpect_error_line = 3\n---\n{source}\n"),
        );
        assert_pass(&run_single_test(&right));

        let wrong = write_fixture(
            dir.path(),
            "wrong.test.md",
            &format!("---\nmax_depth = 1\nstrict = true\nexpect_error_line = 1\n---\n{source}\n"),
        );
        let reason = failure_reason(run_single_test(&wrong));
        assert!(reason.contains("line 3"), "{}", reason);

        let lenient = write_fixture(
            dir.path(),
            "lenient.test.md",
            &format!("---\nmax_depth = 1\nexpect_parse_error = true\n---\n{source}\n"),
        );
        let reason = failure_reason(run_single_test(&lenient));
        assert!(reason.contains("parsing succeeded"), "{}", reason);
    }

    #[test]
    fn rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "pdf.test.md", "---\nformat = \"pdf\"\n---\nx\n");
        let reason = failure_reason(run_single_test(&path));
        assert!(reason.contains("unknown format"), "{}", reason);
    }
}
