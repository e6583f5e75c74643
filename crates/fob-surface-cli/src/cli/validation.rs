use indexmap::IndexMap;

/// Parse an `--exposes` argument: a JSON object mapping exposure names to
/// module paths.
///
/// # Errors
///
/// Returns an error message if the value is not a JSON object of strings.
pub fn parse_exposures(s: &str) -> Result<IndexMap<String, String>, String> {
    serde_json::from_str::<IndexMap<String, String>>(s)
        .map_err(|e| format!("expected a JSON object of name/path strings: {e}"))
}
