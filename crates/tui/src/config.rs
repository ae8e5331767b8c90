use std::{fs::File, str::FromStr, sync::Arc};

use anyhow::{anyhow, Context, Result};
use coursebook_client::{
    CourseStore, DocumentStore, FirestoreConfig, FirestoreStore, Malformed, MemoryStore,
    MissingDelete, StorePolicy, COURSES_COLLECTION,
};
use log::{debug, LevelFilter};
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

const PREFIX: &str = "coursebook";
const CONFIG_FILE: &str = "config.json";

/// Which document store to keep courses in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Backend {
    /// Nothing is kept between runs
    #[default]
    Memory,

    Firestore(FirestoreConfig),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub collection: String,
    pub log_level: String,
    pub skip_malformed: bool,
    pub ignore_missing_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            collection: COURSES_COLLECTION.to_string(),
            log_level: "info".to_string(),
            skip_malformed: true,
            ignore_missing_delete: true,
        }
    }
}

impl Config {
    /// Load the config file, writing out the defaults if there isn't one yet.
    pub fn load_or_init() -> Result<Self> {
        match Self::load()? {
            Some(c) => Ok(c),
            None => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    pub fn load() -> Result<Option<Self>> {
        let Some(path) = BaseDirectories::with_prefix(PREFIX)?.find_config_file(CONFIG_FILE)
        else {
            return Ok(None);
        };

        let file = File::open(&path).context("error opening config file")?;
        let config = serde_json::from_reader(&file).context("error deserialising config file")?;

        Ok(Some(config))
    }

    pub fn save(&self) -> Result<()> {
        let path = BaseDirectories::with_prefix(PREFIX)?.place_config_file(CONFIG_FILE)?;
        debug!("writing config to {:?}", path);

        let mut file = File::create(&path).context("error opening config file")?;
        serde_json::to_writer_pretty(&mut file, &self).context("error serialising config file")?;

        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| anyhow!("invalid log level {:?}", self.log_level))
    }

    pub fn policy(&self) -> StorePolicy {
        StorePolicy {
            malformed: if self.skip_malformed {
                Malformed::Skip
            } else {
                Malformed::Fail
            },
            missing_delete: if self.ignore_missing_delete {
                MissingDelete::Ignore
            } else {
                MissingDelete::Fail
            },
        }
    }

    /// Connect to the configured backend
    pub fn course_store(&self) -> Result<CourseStore> {
        let docs: Arc<dyn DocumentStore> = match &self.backend {
            Backend::Memory => Arc::new(MemoryStore::new()),
            Backend::Firestore(c) => {
                Arc::new(FirestoreStore::new(c.clone()).context("error setting up firestore")?)
            }
        };

        Ok(CourseStore::new(docs)
            .with_collection(self.collection.clone())
            .with_policy(self.policy()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn test_firestore_backend() {
        let config: Config = serde_json::from_str(
            r#"{
                "backend": { "type": "firestore", "project_id": "demo", "api_key": "k" },
                "skip_malformed": false
            }"#,
        )
        .unwrap();

        let mut expected = FirestoreConfig::new("demo");
        expected.api_key = Some("k".into());
        assert_eq!(config.backend, Backend::Firestore(expected));
        assert_eq!(config.policy().malformed, Malformed::Fail);
        assert_eq!(config.policy().missing_delete, MissingDelete::Ignore);
    }

    #[test]
    fn test_bad_log_level() {
        let config = Config {
            log_level: "loud".into(),
            ..Default::default()
        };
        assert!(config.log_level().is_err());
    }
}
