use config::{Config, Environment};
use serde::Deserialize;
use tracing::warn;

const ENV_PREFIX: &str = "CHORUS";

/// Runtime knobs read from `CHORUS_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Documents handed to the worker pool per batch.
    pub chunk_size: usize,
    /// Emit the `lyrics` field.
    pub include_lyrics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chunk_size: 500,
            include_lyrics: true,
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        let built = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize::<Settings>());
        match built {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!("ignoring malformed {}_* settings: {}", ENV_PREFIX, e);
                Settings::default()
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.chunk_size == 0 {
            self.chunk_size = Settings::default().chunk_size;
        }
        self
    }
}
