use serde::Deserialize;

/// One `--config`/`--config-inline` source, applied in argv order with
/// later entries winning per key (§6.3).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    target_tables: Option<String>,
    skip_tables: Option<String>,
    target_schema: Option<String>,
    managed_roles: Option<String>,
    enable_drop: Option<bool>,
    create_index_concurrently: Option<bool>,
}

/// Merged configuration after folding every `--config`/`--config-inline`
/// flag in the order they appeared on the command line.
#[derive(Debug, Clone, Default)]
pub(crate) struct Config {
    pub(crate) target_tables: Vec<String>,
    pub(crate) skip_tables: Vec<String>,
    pub(crate) target_schema: Option<String>,
    pub(crate) managed_roles: Vec<String>,
    pub(crate) enable_drop: bool,
    pub(crate) create_index_concurrently: bool,
}

pub(crate) enum ConfigSource {
    File(std::path::PathBuf),
    Inline(String),
}

pub(crate) fn load(sources: &[ConfigSource]) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    for source in sources {
        let yaml = match source {
            ConfigSource::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
                    path: path.clone(),
                    source,
                })?
            }
            ConfigSource::Inline(yaml) => yaml.clone(),
        };

        let parsed: ConfigFile = serde_yaml::from_str(&yaml).map_err(ConfigError::Parse)?;
        config.merge(parsed);
    }

    Ok(config)
}

impl Config {
    fn merge(&mut self, file: ConfigFile) {
        if let Some(patterns) = file.target_tables {
            self.target_tables = split_patterns(&patterns);
        }
        if let Some(patterns) = file.skip_tables {
            self.skip_tables = split_patterns(&patterns);
        }
        if let Some(schema) = file.target_schema {
            self.target_schema = Some(schema);
        }
        if let Some(roles) = file.managed_roles {
            self.managed_roles = split_patterns(&roles);
        }
        if let Some(enable_drop) = file.enable_drop {
            self.enable_drop = enable_drop;
        }
        if let Some(concurrently) = file.create_index_concurrently {
            self.create_index_concurrently = concurrently;
        }
    }
}

fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(|ch| ch == '\n' || ch == ',')
        .map(str::trim)
        .filter(|pattern| !pattern.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug)]
pub(crate) enum ConfigError {
    ReadFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(source) => write!(f, "failed to parse config: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::Parse(source) => Some(source),
        }
    }
}
