//! Result files.

use std::path::Path;

use crate::ResultsResult;
use crate::types::RunResults;

pub fn save_json(path: &Path, results: &RunResults) -> ResultsResult<()> {
    results.check_complete()?;
    let content = serde_json::to_string_pretty(results)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ResultsResult<RunResults> {
    let content = std::fs::read_to_string(path)?;
    let results: RunResults = serde_json::from_str(&content)?;
    results.check_complete()?;
    Ok(results)
}
