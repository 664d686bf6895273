mod config;
mod error_presentation;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use schemadrift_core::{ConnectionConfig, Dialect, Mode, Orchestrator, OrchestratorOptions};

use config::{Config, ConfigSource};
use error_presentation::{CliError, CliResult, render_runtime_error};

/// `schemadrift <mysql|postgres|sqlite|mssql> [flags] <database>` — one binary behaving
/// as whichever of `mysqldef`/`psqldef`/`sqlite3def`/`mssqldef` its subcommand names.
#[derive(Parser, Debug)]
#[command(name = "schemadrift", version)]
struct Cli {
    #[command(subcommand)]
    command: DialectCommand,
}

#[derive(Subcommand, Debug)]
enum DialectCommand {
    #[cfg(feature = "mysql")]
    Mysql(MysqlArgs),
    #[cfg(feature = "postgres")]
    Postgres(PostgresArgs),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteArgs),
    #[cfg(feature = "mssql")]
    Mssql(MssqlArgs),
}

/// Flags shared by every dialect (spec §6.2). Dry-run is the default mode;
/// `--apply` opts into execution and `--export` conflicts with it.
#[derive(Args, Debug)]
struct CommonArgs {
    /// Desired DDL source; repeatable. Omit to read from stdin.
    #[arg(short = 'f', long = "file")]
    file: Vec<String>,

    /// Execute the plan instead of printing it.
    #[arg(long, conflicts_with = "export")]
    apply: bool,

    /// Print the current schema and exit.
    #[arg(long, conflicts_with = "apply")]
    export: bool,

    /// Permit emission of DROP statements.
    #[arg(long)]
    enable_drop: bool,

    /// YAML config file path; repeatable, later entries win per key.
    #[arg(long = "config")]
    config: Vec<PathBuf>,

    /// Inline YAML config; repeatable, later entries win per key.
    #[arg(long = "config-inline")]
    config_inline: Vec<String>,
}

#[derive(Args, Debug)]
struct NetworkArgs {
    #[arg(short = 'u', long)]
    user: Option<String>,

    #[arg(short = 'h', long)]
    host: Option<String>,

    #[arg(short = 'p', long)]
    password: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    socket: Option<String>,
}

#[derive(Args, Debug)]
struct MysqlArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    network: NetworkArgs,
    /// Database name to connect to.
    database: String,
}

#[derive(Args, Debug)]
struct PostgresArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    network: NetworkArgs,
    #[arg(long)]
    sslmode: Option<String>,
    /// Database name to connect to.
    database: String,
}

#[derive(Args, Debug)]
struct SqliteArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Path to the SQLite database file.
    database: String,
}

#[derive(Args, Debug)]
struct MssqlArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[command(flatten)]
    network: NetworkArgs,
    /// Database name to connect to.
    database: String,
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };
    let subcommand_matches = matches
        .subcommand()
        .map(|(_, matches)| matches)
        .unwrap_or(&matches);

    let result = match cli.command {
        #[cfg(feature = "mysql")]
        DialectCommand::Mysql(args) => run_with_dialect(
            &schemadrift_dialect_mysql::MysqlDialect,
            &args.common,
            subcommand_matches,
            connection_config(&args.database, Some(&args.network), None),
        ),
        #[cfg(feature = "postgres")]
        DialectCommand::Postgres(args) => run_with_dialect(
            &schemadrift_dialect_postgres::PostgresDialect,
            &args.common,
            subcommand_matches,
            connection_config(&args.database, Some(&args.network), args.sslmode.as_deref()),
        ),
        #[cfg(feature = "sqlite")]
        DialectCommand::Sqlite(args) => run_with_dialect(
            &schemadrift_dialect_sqlite::SqliteDialect,
            &args.common,
            subcommand_matches,
            connection_config(&args.database, None, None),
        ),
        #[cfg(feature = "mssql")]
        DialectCommand::Mssql(args) => run_with_dialect(
            &schemadrift_dialect_mssql::MssqlDialect,
            &args.common,
            subcommand_matches,
            connection_config(&args.database, Some(&args.network), None),
        ),
    };

    if let Err(error) = result {
        eprintln!("{}", render_runtime_error(error));
        std::process::exit(1);
    }
}

fn connection_config(
    database: &str,
    network: Option<&NetworkArgs>,
    sslmode: Option<&str>,
) -> CliResult<ConnectionConfig> {
    let mut extra = BTreeMap::new();
    if let Some(sslmode) = sslmode {
        extra.insert("sslmode".to_string(), sslmode.to_string());
    }

    let (host, port, user, password, socket) = match network {
        Some(network) => (
            network.host.clone(),
            network.port,
            network.user.clone(),
            network.password.clone(),
            network.socket.clone(),
        ),
        None => (None, None, None, None, None),
    };

    Ok(ConnectionConfig {
        host,
        port,
        user,
        password,
        database: database.to_string(),
        socket,
        extra,
    })
}

fn run_with_dialect(
    dialect: &dyn Dialect,
    common: &CommonArgs,
    matches: &ArgMatches,
    connection_config: CliResult<ConnectionConfig>,
) -> CliResult<()> {
    let mut connection_config = connection_config?;
    let config = load_config(common, matches)?;
    if let Some(target_schema) = &config.target_schema {
        connection_config
            .extra
            .insert("target_schema".to_string(), target_schema.clone());
    }
    if !config.target_tables.is_empty() {
        connection_config
            .extra
            .insert("target_tables".to_string(), config.target_tables.join("\n"));
    }
    if !config.skip_tables.is_empty() {
        connection_config
            .extra
            .insert("skip_tables".to_string(), config.skip_tables.join("\n"));
    }
    if !config.managed_roles.is_empty() {
        connection_config.extra.insert(
            "managed_roles".to_string(),
            config.managed_roles.join("\n"),
        );
    }
    if config.create_index_concurrently {
        connection_config.extra.insert(
            "create_index_concurrently".to_string(),
            "true".to_string(),
        );
    }
    let enable_drop = config.enable_drop || common.enable_drop;

    let orchestrator = Orchestrator::new(dialect);

    if common.export {
        let options = OrchestratorOptions {
            mode: Mode::Export,
            enable_drop,
        };
        let output = orchestrator.run(&connection_config, "", options)?;
        let schemadrift_core::OrchestratorOutput::ExportSql(sql) = output else {
            unreachable!("Mode::Export always yields ExportSql");
        };
        print!("{}", export_output(&sql));
        return Ok(());
    }

    let desired_sql = read_desired_sql(&common.file)?;
    let mode = if common.apply { Mode::Apply } else { Mode::DryRun };
    let options = OrchestratorOptions { mode, enable_drop };
    let output = orchestrator.run(&connection_config, &desired_sql, options)?;

    match output {
        schemadrift_core::OrchestratorOutput::Applied => {}
        schemadrift_core::OrchestratorOutput::DryRunSql(sql) => {
            print!("{}", dry_run_output(&sql));
        }
        schemadrift_core::OrchestratorOutput::ExportSql(_) => {
            unreachable!("Mode::Apply/DryRun never yield ExportSql")
        }
    }

    Ok(())
}

/// Config sources are merged in the order they appeared on the command
/// line, interleaving `--config` and `--config-inline` (§6.3: "last wins").
fn load_config(common: &CommonArgs, matches: &ArgMatches) -> CliResult<Config> {
    if common.config.is_empty() && common.config_inline.is_empty() {
        return Ok(Config::default());
    }

    let file_indices = matches.indices_of("config").into_iter().flatten();
    let inline_indices = matches.indices_of("config_inline").into_iter().flatten();

    let mut ordered: Vec<(usize, ConfigSource)> = file_indices
        .zip(common.config.iter())
        .map(|(index, path)| (index, ConfigSource::File(path.clone())))
        .chain(
            inline_indices
                .zip(common.config_inline.iter())
                .map(|(index, yaml)| (index, ConfigSource::Inline(yaml.clone()))),
        )
        .collect();
    ordered.sort_by_key(|(index, _)| *index);

    let sources: Vec<ConfigSource> = ordered.into_iter().map(|(_, source)| source).collect();
    config::load(&sources).map_err(CliError::from)
}

fn export_output(sql: &str) -> String {
    if sql.trim().is_empty() {
        return "-- No table exists --\n".to_string();
    }
    sql.to_string()
}

fn dry_run_output(sql: &str) -> String {
    if sql.trim().is_empty() {
        return "-- Nothing is modified --\n".to_string();
    }

    let mut rendered = String::from("-- Apply --\n");
    rendered.push_str(sql);
    rendered
}

fn read_desired_sql(files: &[String]) -> CliResult<String> {
    if files.is_empty() {
        use std::io::Read;
        let mut stdin_sql = String::new();
        std::io::stdin()
            .read_to_string(&mut stdin_sql)
            .map_err(CliError::ReadStdin)?;
        return Ok(stdin_sql);
    }

    let mut combined = String::new();
    for path in files {
        if path == "-" {
            use std::io::Read;
            std::io::stdin()
                .read_to_string(&mut combined)
                .map_err(CliError::ReadStdin)?;
        } else {
            let contents = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
                path: PathBuf::from(path),
                source,
            })?;
            combined.push_str(&contents);
        }
        combined.push('\n');
    }

    Ok(combined)
}
