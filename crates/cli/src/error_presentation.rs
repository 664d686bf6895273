use std::{io, path::PathBuf};

use anyhow::Context;
use miette::Report;

use crate::config::ConfigError;

const ORCHESTRATOR_CONTEXT: &str = "while running orchestrator";
const FILE_READ_CONTEXT: &str = "while reading desired schema file";
const STDIN_READ_CONTEXT: &str = "while reading desired schema from stdin";
const CONFIG_CONTEXT: &str = "while loading config";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    ReadFile {
        path: PathBuf,
        source: io::Error,
    },
    ReadStdin(io::Error),
    Config(ConfigError),
    Core(schemadrift_core::Error),
    #[cfg(not(any(
        feature = "mysql",
        feature = "postgres",
        feature = "sqlite",
        feature = "mssql"
    )))]
    NoDialectsEnabled,
}

impl From<schemadrift_core::Error> for CliError {
    fn from(value: schemadrift_core::Error) -> Self {
        Self::Core(value)
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::ReadStdin(source) => {
            let report = report_with_context(source, STDIN_READ_CONTEXT);
            format!("[io] {report}")
        }
        CliError::Config(source) => {
            let report = report_with_context(source, CONFIG_CONTEXT);
            format!("[config] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, ORCHESTRATOR_CONTEXT);
            format!("[{category}] {report}")
        }
        #[cfg(not(any(
            feature = "mysql",
            feature = "postgres",
            feature = "sqlite",
            feature = "mssql"
        )))]
        CliError::NoDialectsEnabled => format!("[config] {}", no_dialects_enabled_message()),
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = std::result::Result::<(), E>::Err(source)
        .context(context)
        .expect_err("context wrapping must produce an error");
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &schemadrift_core::Error) -> &'static str {
    match error {
        schemadrift_core::Error::Parse(_) => "parse",
        schemadrift_core::Error::Diff(_) => "diff",
        schemadrift_core::Error::Generate(_) => "generate",
        schemadrift_core::Error::Execute(_) => "execute",
    }
}

#[cfg(not(any(
    feature = "mysql",
    feature = "postgres",
    feature = "sqlite",
    feature = "mssql"
)))]
fn no_dialects_enabled_message() -> &'static str {
    "no dialect features are enabled for this build; enable at least one of mysql/postgres/sqlite/mssql"
}
