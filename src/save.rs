use crate::config::RemoteConfig;
use crate::errors::{SaveError, SaveResult};
use crate::monster::MonsterSnapshot;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Persisted game state.
///
/// Every field is optional on load; anything absent keeps the value the
/// running world already has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_pos: Option<[i32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_party: Option<Vec<MonsterSnapshot>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<BTreeMap<String, u32>>,
    /// Defeated flags keyed by "x,y".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainers: Option<BTreeMap<String, bool>>,
}

/// Somewhere a save can be written to and read back from.
pub trait SaveStore {
    /// Short human-readable name, used in messages.
    fn describe(&self) -> &str;

    fn save(&self, data: &SaveData) -> SaveResult<()>;

    /// `Ok(None)` means there is nothing saved yet.
    fn load(&self) -> SaveResult<Option<SaveData>>;
}

/// Pretty-printed JSON on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalSaveStore {
    path: PathBuf,
}

impl LocalSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalSaveStore { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SaveStore for LocalSaveStore {
    fn describe(&self) -> &str {
        "local file"
    }

    fn save(&self, data: &SaveData) -> SaveResult<()> {
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)?;
        log::info!("Saved game to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> SaveResult<Option<SaveData>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let data = serde_json::from_str(&text)?;
        log::info!("Loaded game from {}", self.path.display());
        Ok(Some(data))
    }
}

/// Outcome of a save or load through `FallbackSaveStore`, with the lines to
/// show the player.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreReport<T> {
    pub value: T,
    pub messages: Vec<String>,
}

/// Tries an optional remote store first and falls back to a local one on any
/// remote error.
pub struct FallbackSaveStore {
    remote: Option<Box<dyn SaveStore>>,
    local: Box<dyn SaveStore>,
}

impl FallbackSaveStore {
    pub fn new(remote: Option<Box<dyn SaveStore>>, local: Box<dyn SaveStore>) -> Self {
        FallbackSaveStore { remote, local }
    }

    pub fn local_only(local: Box<dyn SaveStore>) -> Self {
        Self::new(None, local)
    }

    pub fn is_online(&self) -> bool {
        self.remote.is_some()
    }

    pub fn save(&self, data: &SaveData) -> SaveResult<StoreReport<()>> {
        let mut messages = Vec::new();
        if let Some(remote) = &self.remote {
            match remote.save(data) {
                Ok(()) => {
                    messages.push("Game saved to remote server.".to_string());
                    return Ok(StoreReport {
                        value: (),
                        messages,
                    });
                }
                Err(e) => {
                    log::warn!("Remote save via {} failed: {}", remote.describe(), e);
                    messages.push(format!("Online save failed: {}. Saving locally.", e));
                }
            }
        }
        self.local.save(data)?;
        messages.push("Game saved.".to_string());
        Ok(StoreReport {
            value: (),
            messages,
        })
    }

    /// `value` is None when neither store had anything to load.
    pub fn load(&self) -> SaveResult<StoreReport<Option<SaveData>>> {
        let mut messages = Vec::new();
        if let Some(remote) = &self.remote {
            match remote.load() {
                Ok(Some(data)) => {
                    messages.push("Loaded game from remote server.".to_string());
                    return Ok(StoreReport {
                        value: Some(data),
                        messages,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    log::warn!("Remote load via {} failed: {}", remote.describe(), e);
                    messages.push(format!("Online load failed: {}. Trying local save.", e));
                }
            }
        }
        match self.local.load()? {
            Some(data) => {
                messages.push("Loaded game.".to_string());
                Ok(StoreReport {
                    value: Some(data),
                    messages,
                })
            }
            None => {
                messages.push("No save file found.".to_string());
                Ok(StoreReport {
                    value: None,
                    messages,
                })
            }
        }
    }
}

const SAVES_TABLE: &str = "dunkemon_saves";

/// Save slots behind a REST endpoint. Saves are POSTed as new rows; loading
/// fetches the most recent row. The configuration is checked on every call,
/// so a missing URL or key surfaces as an ordinary remote failure.
#[derive(Debug, Clone)]
pub struct HttpSaveStore {
    config: RemoteConfig,
    client: reqwest::blocking::Client,
}

impl HttpSaveStore {
    pub fn new(config: RemoteConfig) -> Self {
        HttpSaveStore {
            config,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn save_url(&self) -> SaveResult<(String, String)> {
        let (base_url, api_key) = self.config.validate()?;
        Ok((format!("{}/{}", base_url, SAVES_TABLE), api_key))
    }

    pub fn latest_url(&self) -> SaveResult<(String, String)> {
        let (url, api_key) = self.save_url()?;
        Ok((format!("{}?limit=1&order=inserted_at.desc", url), api_key))
    }
}

impl SaveStore for HttpSaveStore {
    fn describe(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or("remote server")
    }

    fn save(&self, data: &SaveData) -> SaveResult<()> {
        let (url, api_key) = self.save_url()?;
        let response = self
            .client
            .post(url)
            .header("apikey", api_key)
            .json(data)
            .send()?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(SaveError::Remote(format!(
                "Failed to save remotely: HTTP {}",
                status.as_u16()
            )));
        }
        log::info!("Saved game to {}", self.describe());
        Ok(())
    }

    /// An empty remote table is an error so callers fall back to the local save.
    fn load(&self) -> SaveResult<Option<SaveData>> {
        let (url, api_key) = self.latest_url()?;
        let response = self.client.get(url).header("apikey", api_key).send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(SaveError::Remote(format!(
                "Failed to load remotely: HTTP {}",
                status.as_u16()
            )));
        }
        let rows: Vec<SaveData> = response.json()?;
        match rows.into_iter().next() {
            Some(data) => {
                log::info!("Loaded game from {}", self.describe());
                Ok(Some(data))
            }
            None => Err(SaveError::Remote("No remote saves found".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// In-memory store that can be told to fail.
    struct MemoryStore {
        slot: RefCell<Option<SaveData>>,
        fail: bool,
    }

    impl MemoryStore {
        fn new(fail: bool) -> Self {
            MemoryStore {
                slot: RefCell::new(None),
                fail,
            }
        }
    }

    impl SaveStore for MemoryStore {
        fn describe(&self) -> &str {
            "memory"
        }

        fn save(&self, data: &SaveData) -> SaveResult<()> {
            if self.fail {
                return Err(SaveError::Remote("connection refused".to_string()));
            }
            *self.slot.borrow_mut() = Some(data.clone());
            Ok(())
        }

        fn load(&self) -> SaveResult<Option<SaveData>> {
            if self.fail {
                return Err(SaveError::Remote("connection refused".to_string()));
            }
            Ok(self.slot.borrow().clone())
        }
    }

    fn sample() -> SaveData {
        SaveData {
            player_pos: Some([3, 4]),
            player_party: Some(Vec::new()),
            items: Some(BTreeMap::from([("Potion".to_string(), 2)])),
            trainers: Some(BTreeMap::from([("5,6".to_string(), true)])),
        }
    }

    #[test]
    fn test_save_shape_matches_documented_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "player_pos": [3, 4],
                "player_party": [],
                "items": {"Potion": 2},
                "trainers": {"5,6": true}
            })
        );
    }

    #[test]
    fn test_missing_keys_load_as_none() {
        let data: SaveData = serde_json::from_str(r#"{"player_pos": [1, 2]}"#).unwrap();
        assert_eq!(data.player_pos, Some([1, 2]));
        assert_eq!(data.player_party, None);
        assert_eq!(data.items, None);
    }

    #[test]
    fn test_remote_failure_falls_back_to_local() {
        let store = FallbackSaveStore::new(
            Some(Box::new(MemoryStore::new(true))),
            Box::new(MemoryStore::new(false)),
        );
        let report = store.save(&sample()).unwrap();
        assert_eq!(
            report.messages,
            vec![
                "Online save failed: Remote store error: connection refused. Saving locally."
                    .to_string(),
                "Game saved.".to_string()
            ]
        );

        let loaded = store.load().unwrap();
        assert_eq!(loaded.value, Some(sample()));
        assert_eq!(loaded.messages.last().map(String::as_str), Some("Loaded game."));
    }

    #[test]
    fn test_remote_success_skips_local() {
        let store = FallbackSaveStore::new(
            Some(Box::new(MemoryStore::new(false))),
            Box::new(MemoryStore::new(true)),
        );
        let report = store.save(&sample()).unwrap();
        assert_eq!(report.messages, vec!["Game saved to remote server.".to_string()]);
        assert_eq!(store.load().unwrap().value, Some(sample()));
    }

    #[test]
    fn test_nothing_to_load_is_benign() {
        let store = FallbackSaveStore::local_only(Box::new(MemoryStore::new(false)));
        let report = store.load().unwrap();
        assert_eq!(report.value, None);
        assert_eq!(report.messages, vec!["No save file found.".to_string()]);
    }

    #[test]
    fn test_local_file_round_trip() {
        let path = std::env::temp_dir().join(format!("dunkemon-save-{}.json", std::process::id()));
        let store = LocalSaveStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_http_store_urls() {
        let store = HttpSaveStore::new(RemoteConfig {
            online: true,
            base_url: Some("https://saves.example/rest/v1/".to_string()),
            api_key: Some("key".to_string()),
        });
        assert_eq!(
            store.save_url().unwrap().0,
            "https://saves.example/rest/v1/dunkemon_saves"
        );
        assert_eq!(
            store.latest_url().unwrap().0,
            "https://saves.example/rest/v1/dunkemon_saves?limit=1&order=inserted_at.desc"
        );
    }

    #[test]
    fn test_unconfigured_http_store_falls_back_locally() {
        let store = FallbackSaveStore::new(
            Some(Box::new(HttpSaveStore::new(RemoteConfig {
                online: true,
                ..RemoteConfig::default()
            }))),
            Box::new(MemoryStore::new(false)),
        );
        let report = store.save(&sample()).unwrap();
        assert_eq!(
            report.messages[0],
            "Online save failed: Remote store error: Remote configuration missing \
             (REMOTE_BASE_URL or REMOTE_API_KEY). Saving locally."
        );
    }
}
