use std::sync::Arc;

use regex::Regex;

use crate::{
    ConnectionConfig, DatabaseAdapter, Dialect, DiffConfig, DiffDiagnostics, DiffEngine,
    DiffError, EquivalencePolicy, Executor, Expr, OrchestratorOutput::*, Renderer, Result,
    SchemaObject, Statement, TableFilter,
};

const TARGET_TABLES_KEY: &str = "target_tables";
const SKIP_TABLES_KEY: &str = "skip_tables";
const MANAGED_ROLES_KEY: &str = "managed_roles";
const CREATE_INDEX_CONCURRENTLY_KEY: &str = "create_index_concurrently";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    DryRun,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub mode: Mode,
    pub enable_drop: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrchestratorOutput {
    Applied,
    DryRunSql(String),
    ExportSql(String),
}

pub struct Orchestrator<'a> {
    dialect: &'a dyn Dialect,
    diff_engine: DiffEngine,
}

impl<'a> Orchestrator<'a> {
    #[must_use]
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            dialect,
            diff_engine: DiffEngine::new(),
        }
    }

    pub fn run(
        &self,
        connection_config: &ConnectionConfig,
        desired_sql: &str,
        options: OrchestratorOptions,
    ) -> Result<OrchestratorOutput> {
        let mut adapter = self.dialect.connect(connection_config)?;
        let current_sql = adapter.export_schema()?;
        match options.mode {
            Mode::Export => Ok(ExportSql(self.export_sql_from_input(&current_sql)?)),
            Mode::Apply | Mode::DryRun => {
                let current = self.parse_and_normalize(&current_sql)?;
                let desired = self.parse_and_normalize(desired_sql)?;
                let diff_config =
                    self.diff_config(adapter.as_ref(), connection_config, options.enable_drop)?;
                let diff_outcome =
                    self.diff_engine
                        .diff_with_diagnostics(&desired, &current, &diff_config)?;
                let statements = self.dialect.generate_ddl(&diff_outcome.ops)?;

                if options.mode == Mode::Apply {
                    let mut executor = Executor::new(adapter.as_mut());
                    executor.execute_plan(&statements)?;
                    Ok(OrchestratorOutput::Applied)
                } else {
                    let rendered = self.render_dry_run(&statements, &diff_outcome.diagnostics);
                    Ok(DryRunSql(rendered))
                }
            }
        }
    }

    pub fn export_roundtrip_matches(&self, exported_sql: &str) -> Result<bool> {
        let re_exported_sql = self.export_sql_from_input(exported_sql)?;
        Ok(exported_sql == re_exported_sql)
    }

    fn parse_and_normalize(&self, sql: &str) -> Result<Vec<SchemaObject>> {
        let mut objects = self.dialect.parse(sql)?;
        for object in &mut objects {
            self.dialect.normalize(object);
        }
        Ok(objects)
    }

    fn export_sql_from_input(&self, sql: &str) -> Result<String> {
        let objects = self.parse_and_normalize(sql)?;
        self.render_export(&objects)
    }

    fn diff_config(
        &self,
        adapter: &dyn DatabaseAdapter,
        connection_config: &ConnectionConfig,
        enable_drop: bool,
    ) -> Result<DiffConfig> {
        let target = compile_patterns(connection_config, TARGET_TABLES_KEY)?;
        let skip = compile_patterns(connection_config, SKIP_TABLES_KEY)?;
        let managed_roles = split_extra(connection_config, MANAGED_ROLES_KEY);
        let create_index_concurrently = connection_config
            .extra
            .get(CREATE_INDEX_CONCURRENTLY_KEY)
            .is_some_and(|value| value == "true");

        let config = DiffConfig::new(
            enable_drop,
            adapter.schema_search_path(),
            Arc::new(DelegatingEquivalencePolicy {
                inner: self.dialect.equivalence_policy(),
            }),
        )
        .with_table_filter(TableFilter::new(target, skip))
        .with_managed_roles(managed_roles)
        .with_create_index_concurrently(create_index_concurrently);

        Ok(config)
    }

    fn render_dry_run(&self, statements: &[Statement], diagnostics: &DiffDiagnostics) -> String {
        let renderer = Renderer::new(self.dialect);
        let mut rendered = String::new();

        renderer.render_skipped_diagnostics(&mut rendered, &skipped_messages(diagnostics));
        rendered.push_str(&renderer.render(statements));

        rendered
    }

    fn render_export(&self, objects: &[SchemaObject]) -> Result<String> {
        let mut rendered = String::new();
        for object in objects {
            rendered.push_str(&self.dialect.to_sql(object)?);
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

struct DelegatingEquivalencePolicy {
    inner: &'static dyn EquivalencePolicy,
}

impl EquivalencePolicy for DelegatingEquivalencePolicy {
    fn is_equivalent_expr(&self, left: &Expr, right: &Expr) -> bool {
        self.inner.is_equivalent_expr(left, right)
    }

    fn is_equivalent_custom_type(&self, left: &str, right: &str) -> bool {
        self.inner.is_equivalent_custom_type(left, right)
    }
}

fn split_extra(connection_config: &ConnectionConfig, key: &'static str) -> Vec<String> {
    match connection_config.extra.get(key) {
        Some(raw) => raw
            .split('\n')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn compile_patterns(connection_config: &ConnectionConfig, key: &'static str) -> Result<Vec<Regex>> {
    split_extra(connection_config, key)
        .into_iter()
        .map(|pattern| {
            Regex::new(&pattern).map_err(|source| {
                DiffError::InvalidTableFilterPattern {
                    key,
                    pattern,
                    source,
                }
                .into()
            })
        })
        .collect()
}

fn skipped_messages(diagnostics: &DiffDiagnostics) -> Vec<String> {
    diagnostics
        .skipped_ops
        .iter()
        .map(|diagnostic| diagnostic.kind.tag().to_string())
        .collect()
}
