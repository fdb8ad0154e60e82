use crate::battle::state::TurnRng;
use crate::catalog::Catalog;
use crate::errors::{GameResult, SaveError, SaveResult};
use crate::map::MapGrid;
use crate::save::{FallbackSaveStore, HttpSaveStore, LocalSaveStore};
use schema::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

pub const ONLINE_MODE_VAR: &str = "ONLINE_MODE";
pub const REMOTE_BASE_URL_VAR: &str = "REMOTE_BASE_URL";
pub const REMOTE_API_KEY_VAR: &str = "REMOTE_API_KEY";
pub const DATA_DIR_VAR: &str = "DUNKEMON_DATA_DIR";
pub const MAP_VAR: &str = "DUNKEMON_MAP";
pub const SAVE_VAR: &str = "DUNKEMON_SAVE";
pub const SEED_VAR: &str = "DUNKEMON_SEED";

/// Settings for the optional online save backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub online: bool,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl RemoteConfig {
    /// Base URL (without a trailing slash) and API key, or an error naming
    /// what is missing.
    pub fn validate(&self) -> SaveResult<(String, String)> {
        match (non_empty(&self.base_url), non_empty(&self.api_key)) {
            (Some(url), Some(key)) => Ok((url.trim_end_matches('/').to_string(), key.to_string())),
            _ => Err(SaveError::Remote(format!(
                "Remote configuration missing ({} or {})",
                REMOTE_BASE_URL_VAR, REMOTE_API_KEY_VAR
            ))),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Everything needed to start a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Directory holding species/moves/areas tables. Built-in data when unset.
    pub data_dir: Option<PathBuf>,
    /// Overworld map file. Built-in map when unset.
    pub map_path: Option<PathBuf>,
    pub save_path: PathBuf,
    pub starter_species: String,
    pub starter_level: u8,
    pub starting_items: BTreeMap<String, u32>,
    pub seed: Option<u64>,
    pub remote: RemoteConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            data_dir: None,
            map_path: None,
            save_path: PathBuf::from("save.json"),
            starter_species: "Ignis".to_string(),
            starter_level: 5,
            starting_items: BTreeMap::from([
                (Item::Potion.to_string(), 3),
                (Item::NetBall.to_string(), 5),
            ]),
            seed: None,
            remote: RemoteConfig::default(),
        }
    }
}

impl GameConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| env::var(name).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = GameConfig::default();

        config.remote.online = lookup(ONLINE_MODE_VAR).as_deref() == Some("1");
        config.remote.base_url = lookup(REMOTE_BASE_URL_VAR);
        config.remote.api_key = lookup(REMOTE_API_KEY_VAR);

        if let Some(dir) = lookup(DATA_DIR_VAR) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(map) = lookup(MAP_VAR) {
            config.map_path = Some(PathBuf::from(map));
        }
        if let Some(save) = lookup(SAVE_VAR) {
            config.save_path = PathBuf::from(save);
        }
        if let Some(seed) = lookup(SEED_VAR) {
            match seed.trim().parse() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => log::warn!("Ignoring non-numeric {}: '{}'", SEED_VAR, seed),
            }
        }
        config
    }

    pub fn load_catalog(&self) -> GameResult<Catalog> {
        let catalog = match &self.data_dir {
            Some(dir) => Catalog::load_dir(dir)?,
            None => Catalog::builtin()?,
        };
        Ok(catalog)
    }

    pub fn load_map(&self) -> GameResult<MapGrid> {
        let grid = match &self.map_path {
            Some(path) => MapGrid::load(path)?,
            None => MapGrid::builtin()?,
        };
        Ok(grid)
    }

    pub fn rng(&self) -> TurnRng {
        match self.seed {
            Some(seed) => TurnRng::seeded(seed),
            None => TurnRng::new_random(),
        }
    }

    /// Local store, fronted by the remote one when online mode is on.
    pub fn save_store(&self) -> FallbackSaveStore {
        let local = Box::new(LocalSaveStore::new(self.save_path.clone()));
        if self.remote.online {
            let remote = Box::new(HttpSaveStore::new(self.remote.clone()));
            FallbackSaveStore::new(Some(remote), local)
        } else {
            FallbackSaveStore::local_only(local)
        }
    }
}
