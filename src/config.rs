use crate::lens::utils::OutputFormat;
use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;

pub struct IpgeoConfig {
    /// Output format used when none is given on the command line
    pub format: OutputFormat,
}

const EMPTY_CONFIG: &str = r#"### ipgeo configuration file

### default output format: summary, details, table, json, json-pretty
# format = "summary"
"#;

impl Default for IpgeoConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
        }
    }
}

impl IpgeoConfig {
    /// Function to create and initialize a new configuration
    ///
    /// An explicit `path` that does not exist yet is created from a commented
    /// template. Without a path, `$HOME/.ipgeo.toml` is read if present.
    pub fn new(path: &Option<String>) -> Result<IpgeoConfig> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                if let Some(p) = Self::config_file_path() {
                    if Path::new(p.as_str()).exists() {
                        builder = builder.add_source(config::File::with_name(p.as_str()));
                    }
                }
            }
        }

        // Add in settings from the environment (with a prefix of IPGEO)
        // E.g., `IPGEO_FORMAT=json ./ipgeo` would print JSON
        builder = builder.add_source(config::Environment::with_prefix("IPGEO"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_settings(&config)
    }

    fn from_settings(settings: &HashMap<String, String>) -> Result<IpgeoConfig> {
        let format = match settings.get("format") {
            Some(f) => f
                .parse::<OutputFormat>()
                .map_err(|e| anyhow!("Invalid format in configuration: {}", e))?,
            None => OutputFormat::default(),
        };

        Ok(IpgeoConfig { format })
    }

    /// Get the default config file path
    pub fn config_file_path() -> Option<String> {
        dirs::home_dir().map(|h| format!("{}/.ipgeo.toml", h.to_string_lossy()))
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        format!("Output Format:      {}", self.format)
    }
}
