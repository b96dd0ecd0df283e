//! Share-this-achievement link construction.
//!
//! The public URL of the hosted lesson is percent-encoded into a fixed
//! LinkedIn share template. Encoding is delegated to the `url` crate's query
//! serializer, so reserved characters in the app URL survive intact.

use thiserror::Error;
use url::Url;

/// Share endpoint the app URL is embedded into.
pub const SHARE_ENDPOINT: &str = "https://www.linkedin.com/sharing/share-offsite/";

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("App URL must not be empty")]
    EmptyAppUrl,
    #[error("Invalid URL: {0}")]
    Parse(#[from] url::ParseError),
}

/// Build the share link for a public app URL.
pub fn share_url(app_url: &str) -> Result<Url, ShareError> {
    let app_url = app_url.trim();
    if app_url.is_empty() {
        return Err(ShareError::EmptyAppUrl);
    }
    // Validate the app URL itself before embedding it
    Url::parse(app_url)?;
    Ok(Url::parse_with_params(SHARE_ENDPOINT, &[("url", app_url)])?)
}
