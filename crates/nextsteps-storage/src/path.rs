//! Object path normalisation and public URL construction.

use url::Url;

use nextsteps_core::error::AppError;
use nextsteps_core::result::AppResult;

/// Normalise an object path: strip leading/trailing slashes, collapse
/// empty segments and reject `.`/`..` so objects stay inside the store.
pub fn normalize(path: &str) -> AppResult<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" => continue,
            "." | ".." => {
                return Err(AppError::validation(format!(
                    "Invalid blob path segment in '{path}'"
                )));
            }
            s if s.contains('\\') => {
                return Err(AppError::validation(format!("Invalid blob path '{path}'")));
            }
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(AppError::validation("Blob path must not be empty"));
    }
    Ok(segments.join("/"))
}

/// Append an object path to a base URL, percent-encoding each segment.
pub fn public_url(base: &Url, path: &str) -> AppResult<String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::configuration(format!("Public base URL cannot hold paths: {base}")))?
        .pop_if_empty()
        .extend(path.split('/'));
    Ok(url.to_string())
}

/// Parse the configured public base URL.
pub fn parse_base_url(raw: &str) -> AppResult<Url> {
    Url::parse(raw).map_err(|e| {
        AppError::with_source(
            nextsteps_core::error::ErrorKind::Configuration,
            format!("Invalid public base URL '{raw}'"),
            e,
        )
    })
}
