use std::env;

/// Settings taken from the environment (and `.env`), overridable on the
/// command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Site name written into forcing file headers.
    pub site: String,
    /// Author written into the "Created by" header line.
    pub created_by: String,
    pub log_file_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Config {
            site: lookup("MET_SITE").unwrap_or_else(|| "unknown-site".to_string()),
            created_by: lookup("MET_CREATED_BY")
                .or_else(|| lookup("USER"))
                .unwrap_or_else(|| "met_forcing".to_string()),
            log_file_path: lookup("LOG_FILE_PATH")
                .unwrap_or_else(|| "logs/met_forcing.log".to_string()),
        }
    }
}
