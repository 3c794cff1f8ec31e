//! Dataset column checks

use crate::error::{ConstanciaError, ConstanciaResult};

/// Trim, replace spaces with underscores and lowercase a header name
pub fn normalize_column(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// Required columns absent from `columns`, in the order they are required.
/// Both sides are compared after [`normalize_column`].
pub fn missing_columns<S: AsRef<str>>(columns: &[S], required: &[&str]) -> Vec<String> {
    let present: Vec<String> = columns.iter().map(|c| normalize_column(c.as_ref())).collect();
    required
        .iter()
        .map(|r| normalize_column(r))
        .filter(|r| !present.contains(r))
        .collect()
}

/// Fail with [`ConstanciaError::MissingColumns`] naming exactly the absent
/// required columns
pub fn validate_columns<S: AsRef<str>>(columns: &[S], required: &[&str]) -> ConstanciaResult<()> {
    let missing = missing_columns(columns, required);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConstanciaError::MissingColumns(missing))
    }
}
