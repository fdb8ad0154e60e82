use thiserror::Error;

/// Main error type for the Dunkemon core.
///
/// Only malformed reference data, malformed maps and persistence failures end
/// up here. Expected in-game conditions (no PP, invalid move index, capture in
/// a trainer battle, ...) are reported as battle events instead.
#[derive(Debug, Error)]
pub enum GameError {
    /// Error related to catalog lookup or validation
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    /// Error related to map parsing
    #[error("Map error: {0}")]
    Map(#[from] MapError),
    /// Error related to saving or loading a game
    #[error("Save error: {0}")]
    Save(#[from] SaveError),
}

/// Errors related to species, move and encounter catalogs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The specified species was not found in the catalog
    #[error("Species not found: {0}")]
    SpeciesNotFound(String),
    /// The specified move was not found in the catalog
    #[error("Move not found: {0}")]
    MoveNotFound(String),
    /// Catalog data parsed but breaks an invariant
    #[error("Malformed catalog data: {0}")]
    MalformedData(String),
    /// Catalog file could not be read or parsed
    #[error("Could not parse catalog: {0}")]
    Parse(String),
}

/// Errors related to map parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Map has no rows")]
    Empty,
    /// Map file could not be read
    #[error("Could not read map: {0}")]
    Unreadable(String),
}

/// Errors related to persistence
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Save data parsed but does not fit the catalog or the map
    #[error("Malformed save data: {0}")]
    MalformedData(String),
    /// Remote store was misconfigured or failed
    #[error("Remote store error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for SaveError {
    fn from(error: reqwest::Error) -> Self {
        SaveError::Remote(error.to_string())
    }
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Type alias for Results using SaveError
pub type SaveResult<T> = Result<T, SaveError>;
