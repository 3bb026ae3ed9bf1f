use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::Chunker;

#[derive(Debug, serde::Deserialize, Clone)]
pub struct Settings {
    pub telemetry: TelemetrySettings,
    pub merge_fields: MergeFieldSettings,
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct TelemetrySettings {
    pub name: String,
    pub level: String,
}

#[derive(Debug, serde::Deserialize, Clone)]
pub struct MergeFieldSettings {
    // APP_MERGE_FIELDS__CHUNK_LENGTH arrives as a string
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub chunk_length: usize,
}

impl MergeFieldSettings {
    /// Falls back to the default chunker when the configured length is zero.
    pub fn chunker(&self) -> Chunker {
        Chunker::new(self.chunk_length).unwrap_or_else(|| {
            tracing::warn!("merge_fields.chunk_length must be positive, using the default");
            Chunker::default()
        })
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Reads `configuration/base.yaml`, the file for `APP_ENVIRONMENT` (default `local`),
/// then `APP_`-prefixed environment variables, e.g. `APP_TELEMETRY__LEVEL=debug`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine cwd: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
