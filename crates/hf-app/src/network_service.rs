//! Network file loading, saving, validation, and introspection.

use std::path::Path;

use hf_network::{
    NetworkError, NetworkRecords, NetworkSummary, RunOptions, build_network, build_topology,
};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Load component records from a YAML, JSON, or `.inp` file.
pub fn load_network(path: &Path) -> AppResult<NetworkRecords> {
    let records = hf_network::load_records(path).map_err(|source| AppError::NetworkFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        nodes = records.node_ids().count(),
        "loaded network records"
    );
    Ok(records)
}

/// Save component records as YAML or JSON, chosen by extension.
pub fn save_network(path: &Path, records: &NetworkRecords) -> AppResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let result = match ext.as_deref() {
        Some("yaml") | Some("yml") => hf_network::save_yaml(path, records),
        Some("json") => hf_network::save_json(path, records),
        _ => Err(NetworkError::UnsupportedFormat(path.display().to_string())),
    };
    result.map_err(|source| AppError::NetworkFileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Check records against the topology rules and component parameter ranges.
pub fn validate_network(records: &NetworkRecords) -> AppResult<()> {
    build_topology(records)?;
    Ok(())
}

pub fn summarize_network(records: &NetworkRecords) -> AppResult<NetworkSummary> {
    let network = build_topology(records)?;
    Ok(NetworkSummary::of(&network))
}

/// The canonical network description for a run with these options.
pub fn build_description(records: &NetworkRecords, options: &RunOptions) -> AppResult<String> {
    Ok(build_network(records, options)?.description)
}
