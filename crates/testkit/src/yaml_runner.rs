use std::{collections::BTreeMap, path::Path};

use schemadrift_core::{
    DatabaseAdapter, DiffConfig, DiffEngine, DiffError, Dialect, ParseError, Result, SchemaObject,
    SourceLocation, Statement, Version,
};
use serde::Deserialize;

const TESTCASE_SOURCE_LABEL: &str = "yaml testcase";

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestCase {
    pub current: String,
    pub desired: String,
    pub up: Option<String>,
    pub down: Option<String>,
    pub error: Option<String>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
    pub flavor: Option<String>,
    /// `None` resolves to `false` at execution time.
    pub enable_drop: Option<bool>,
    pub offline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Skipped(String),
    Failed(String),
}

pub fn load_test_cases_from_str(yaml: &str) -> Result<BTreeMap<String, TestCase>> {
    serde_yaml::from_str(yaml).map_err(|source| parse_yaml_error(yaml, source))
}

/// Reads a single YAML seed/fixture file from disk and parses it the same
/// way [`load_test_cases_from_str`] does.
pub fn load_test_cases_from_path(path: &Path) -> Result<BTreeMap<String, TestCase>> {
    let yaml = std::fs::read_to_string(path)
        .map_err(|source| file_read_error(path, source))?;
    load_test_cases_from_str(&yaml)
}

/// Loads and merges every `*.yml`/`*.yaml` file directly under `dir`, in
/// file-name order, failing if any two files declare the same testcase name.
pub fn load_test_cases_from_dir(dir: &Path) -> Result<BTreeMap<String, TestCase>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .map_err(|source| file_read_error(dir, source))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yml" | "yaml")
            )
        })
        .collect();
    paths.sort();

    let mut merged = BTreeMap::new();
    for path in paths {
        for (name, case) in load_test_cases_from_path(&path)? {
            if merged.insert(name.clone(), case).is_some() {
                return Err(DiffError::ObjectComparison {
                    target: "testcase name".to_string(),
                    operation: format!(
                        "duplicate testcase `{name}` across files in {}",
                        dir.display()
                    ),
                }
                .into());
            }
        }
    }

    Ok(merged)
}

fn file_read_error(path: &Path, source: std::io::Error) -> schemadrift_core::Error {
    ParseError::StatementConversion {
        statement_index: 0,
        source_sql: path.display().to_string(),
        source_location: None,
        source: Box::new(source),
    }
    .into()
}

pub fn matches_flavor(requirement: Option<&str>, current_flavor: &str) -> bool {
    let Some(requirement) = requirement.map(str::trim).filter(|value| !value.is_empty()) else {
        return true;
    };

    if let Some(excluded_flavor) = requirement.strip_prefix('!') {
        return excluded_flavor != current_flavor;
    }

    requirement == current_flavor
}

pub fn run_offline_test(dialect: &dyn Dialect, test: &TestCase) -> TestResult {
    run_with_flavor_expectation(test, dialect.name(), || run_offline_test_impl(dialect, test))
}

pub fn run_online_test(
    dialect: &dyn Dialect,
    adapter: &mut dyn DatabaseAdapter,
    test: &TestCase,
) -> TestResult {
    let version = match adapter.server_version() {
        Ok(version) => version,
        Err(error) => return TestResult::Failed(error.to_string()),
    };

    if let Some(reason) = version_skip_reason(test, &version) {
        return TestResult::Skipped(reason);
    }

    run_with_flavor_expectation(test, dialect.name(), || {
        run_online_test_impl(dialect, adapter, test)
    })
}

fn run_with_flavor_expectation(
    test: &TestCase,
    current_flavor: &str,
    execute: impl FnOnce() -> Result<()>,
) -> TestResult {
    let flavor_requirement = test.flavor.as_deref();
    let expect_failure = !matches_flavor(flavor_requirement, current_flavor);
    let execution_result = execute();

    if expect_failure {
        return match execution_result {
            Err(_) => TestResult::Skipped(format!(
                "Correctly fails on non-matching flavor (requires '{}', running on '{}')",
                flavor_requirement.unwrap_or_default(),
                current_flavor
            )),
            Ok(()) => TestResult::Failed(format!(
                "Test passed but flavor '{}' does not match current flavor '{}'",
                flavor_requirement.unwrap_or_default(),
                current_flavor
            )),
        };
    }

    match execution_result {
        Ok(()) => TestResult::Passed,
        Err(error) => TestResult::Failed(error.to_string()),
    }
}

/// Runs the forward and reverse diff for a test case, checking `up`/`down`
/// SQL expectations and the `error` expectation contract. No database is
/// involved: this only exercises `Dialect::parse`, [`DiffEngine::diff`] and
/// `Dialect::generate_ddl`.
fn run_offline_test_impl(dialect: &dyn Dialect, test: &TestCase) -> Result<()> {
    let config = diff_config(test);
    let engine = DiffEngine::new();

    let outcome: Result<()> = (|| {
        let current_objects = dialect.parse(&test.current)?;
        let desired_objects = dialect.parse(&test.desired)?;

        let forward_ops = engine.diff(&desired_objects, &current_objects, &config)?;
        let forward_sql = render_statements(&dialect.generate_ddl(&forward_ops)?);
        if let Some(expected_up) = &test.up {
            if &forward_sql != expected_up {
                return Err(mismatch_error("up", expected_up, &forward_sql));
            }
        }

        let reverse_ops = engine.diff(&current_objects, &desired_objects, &config)?;
        let reverse_sql = render_statements(&dialect.generate_ddl(&reverse_ops)?);
        if let Some(expected_down) = &test.down {
            if &reverse_sql != expected_down {
                return Err(mismatch_error("down", expected_down, &reverse_sql));
            }
        }

        Ok(())
    })();

    reconcile_error_expectation(test, outcome)
}

/// Drives the forward migration against a live adapter inside a transaction,
/// then asserts re-exporting the schema and diffing it against the desired
/// schema yields no drift (the idempotence property every generated plan
/// must satisfy), then does the same in reverse back to `current`.
fn run_online_test_impl(
    dialect: &dyn Dialect,
    adapter: &mut dyn DatabaseAdapter,
    test: &TestCase,
) -> Result<()> {
    let mut config = diff_config(test);
    config.schema_search_path = adapter.schema_search_path();
    let engine = DiffEngine::new();

    let current_objects = dialect.parse(&test.current)?;
    let desired_objects = dialect.parse(&test.desired)?;

    let outcome: Result<()> = (|| {
        apply_diff(
            dialect,
            adapter,
            &engine,
            &desired_objects,
            &current_objects,
            &config,
            test.up.as_deref(),
        )?;
        assert_idempotent(dialect, adapter, &desired_objects, &config)?;

        apply_diff(
            dialect,
            adapter,
            &engine,
            &current_objects,
            &desired_objects,
            &config,
            test.down.as_deref(),
        )?;
        assert_idempotent(dialect, adapter, &current_objects, &config)?;

        Ok(())
    })();

    reconcile_error_expectation(test, outcome)
}

#[allow(clippy::too_many_arguments)]
fn apply_diff(
    dialect: &dyn Dialect,
    adapter: &mut dyn DatabaseAdapter,
    engine: &DiffEngine,
    desired: &[SchemaObject],
    current: &[SchemaObject],
    config: &DiffConfig,
    expected_sql: Option<&str>,
) -> Result<()> {
    let ops = engine.diff(desired, current, config)?;
    let statements = dialect.generate_ddl(&ops)?;

    let rendered = render_statements(&statements);
    if let Some(expected) = expected_sql {
        if rendered != expected {
            return Err(mismatch_error("sql", expected, &rendered));
        }
    }

    let mut transaction = adapter.begin()?;
    for statement in &statements {
        if let Statement::Sql { sql, .. } = statement {
            transaction.execute(sql)?;
        }
    }
    transaction.commit()
}

fn assert_idempotent(
    dialect: &dyn Dialect,
    adapter: &dyn DatabaseAdapter,
    expected: &[SchemaObject],
    config: &DiffConfig,
) -> Result<()> {
    let exported = adapter.export_schema()?;
    let actual = dialect.parse(&exported)?;

    let engine = DiffEngine::new();
    let drift = engine.diff(expected, &actual, config)?;
    if drift.is_empty() {
        Ok(())
    } else {
        Err(DiffError::ObjectComparison {
            target: "online schema".to_string(),
            operation: format!(
                "exported schema is not idempotent against the expected schema ({} drift op(s))",
                drift.len()
            ),
        }
        .into())
    }
}

fn reconcile_error_expectation(test: &TestCase, outcome: Result<()>) -> Result<()> {
    match (&test.error, outcome) {
        (Some(expected), Err(error)) if error.to_string() == *expected => Ok(()),
        (Some(expected), Err(error)) => {
            Err(mismatch_error("error", expected, &error.to_string()))
        }
        (Some(_), Ok(())) => Err(DiffError::ObjectComparison {
            target: "error expectation".to_string(),
            operation: "test case declared `error` but execution succeeded".to_string(),
        }
        .into()),
        (None, Err(error)) => Err(error),
        (None, Ok(())) => Ok(()),
    }
}

fn diff_config(test: &TestCase) -> DiffConfig {
    DiffConfig {
        enable_drop: test.enable_drop.unwrap_or(false),
        ..DiffConfig::default()
    }
}

fn render_statements(statements: &[Statement]) -> String {
    statements
        .iter()
        .filter_map(|statement| match statement {
            Statement::Sql { sql, .. } => Some(sql.as_str()),
            Statement::BatchBoundary => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn mismatch_error(target: &str, expected: &str, actual: &str) -> schemadrift_core::Error {
    DiffError::ObjectComparison {
        target: target.to_string(),
        operation: format!("expected `{expected}`, got `{actual}`"),
    }
    .into()
}

fn version_skip_reason(test: &TestCase, version: &Version) -> Option<String> {
    if let Some(min) = test.min_version.as_deref() {
        if let Some(bound) = parse_version_bound(min) {
            if version_tuple(version) < bound {
                return Some(format!(
                    "server version {} is below min_version {min}",
                    format_version(version)
                ));
            }
        }
    }

    if let Some(max) = test.max_version.as_deref() {
        if let Some(bound) = parse_version_bound(max) {
            if version_tuple(version) > bound {
                return Some(format!(
                    "server version {} is above max_version {max}",
                    format_version(version)
                ));
            }
        }
    }

    None
}

fn version_tuple(version: &Version) -> (u16, u16, u16) {
    (version.major, version.minor, version.patch)
}

fn format_version(version: &Version) -> String {
    format!("{}.{}.{}", version.major, version.minor, version.patch)
}

fn parse_version_bound(raw: &str) -> Option<(u16, u16, u16)> {
    let mut parts = raw.trim().split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
    let patch = parts.next().map(str::parse).transpose().ok()?.unwrap_or(0);
    Some((major, minor, patch))
}

fn parse_yaml_error(yaml: &str, source: serde_yaml::Error) -> schemadrift_core::Error {
    let source_location = source.location().map(|location| SourceLocation {
        line: location.line(),
        column: Some(location.column()),
    });

    ParseError::StatementConversion {
        statement_index: 0,
        source_sql: source_sql_excerpt(yaml),
        source_location,
        source: Box::new(source),
    }
    .into()
}

fn source_sql_excerpt(yaml: &str) -> String {
    let trimmed = yaml.trim();
    if trimmed.is_empty() {
        return TESTCASE_SOURCE_LABEL.to_string();
    }

    const MAX_CHARS: usize = 256;
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }

    let mut excerpt: String = trimmed.chars().take(MAX_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}
