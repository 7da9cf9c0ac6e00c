//! hf-network: network model builder.
//!
//! Turns normalized component records into a validated [`Network`] and its
//! canonical section-structured description. Records load from JSON or YAML;
//! descriptions can be read back with [`parse_description`].

pub mod builder;
pub mod inp;
pub mod network;
pub mod options;
pub mod pattern;
pub mod schema;
pub mod summary;
pub mod validate;

use std::path::Path;

pub use builder::{BuiltNetwork, build_network, build_topology};
pub use inp::{parse_description, write_description};
pub use network::Network;
pub use options::{RunOptions, TimeStep, clock_label};
pub use pattern::DemandPattern;
pub use schema::*;
pub use summary::NetworkSummary;
pub use validate::{ValidationError, validate_records};

pub type NetworkResult<T> = Result<T, NetworkError>;

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Graph error: {0}")]
    Graph(#[from] hf_graph::GraphError),

    #[error("Description line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> NetworkResult<NetworkRecords> {
    let content = std::fs::read_to_string(path)?;
    let records: NetworkRecords = serde_yaml::from_str(&content)?;
    validate_records(&records)?;
    Ok(records)
}

pub fn save_yaml(path: &Path, records: &NetworkRecords) -> NetworkResult<()> {
    validate_records(records)?;
    let content = serde_yaml::to_string(records)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> NetworkResult<NetworkRecords> {
    let content = std::fs::read_to_string(path)?;
    let records: NetworkRecords = serde_json::from_str(&content)?;
    validate_records(&records)?;
    Ok(records)
}

pub fn save_json(path: &Path, records: &NetworkRecords) -> NetworkResult<()> {
    validate_records(records)?;
    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Read a description file (`.inp`).
pub fn load_description(path: &Path) -> NetworkResult<NetworkRecords> {
    let content = std::fs::read_to_string(path)?;
    let records = parse_description(&content)?;
    validate_records(&records)?;
    Ok(records)
}

/// Load records, choosing the format by file extension.
pub fn load_records(path: &Path) -> NetworkResult<NetworkRecords> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "yaml" | "yml" => load_yaml(path),
        "json" => load_json(path),
        "inp" => load_description(path),
        _ => Err(NetworkError::UnsupportedFormat(path.display().to_string())),
    }
}
