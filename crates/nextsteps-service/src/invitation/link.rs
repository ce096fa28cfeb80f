//! Setup link construction and parsing.

use url::Url;

use nextsteps_core::error::{AppError, ErrorKind};
use nextsteps_core::result::AppResult;

/// Query parameter carrying the invitation token.
pub const TOKEN_PARAM: &str = "token";

/// Build `<base>?token=<token>`.
pub fn setup_link(base: &str, token: &str) -> AppResult<String> {
    let mut url = Url::parse(base).map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Invalid setup base URL '{base}'"),
            e,
        )
    })?;
    url.query_pairs_mut().append_pair(TOKEN_PARAM, token);
    Ok(url.to_string())
}

/// Extract the invitation token from a setup link.
pub fn token_from_link(link: &str) -> AppResult<String> {
    let url = Url::parse(link.trim())
        .map_err(|e| AppError::with_source(ErrorKind::Validation, "Invalid setup link", e))?;
    url.query_pairs()
        .find(|(key, _)| key == TOKEN_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::validation("Missing token."))
}
