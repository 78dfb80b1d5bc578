// src/presidents/fetch.rs

use reqwest::{
    blocking::Client,
    header::{FROM, USER_AGENT},
};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::{Result, WrangleError};

pub const PRESIDENTS_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_presidents_of_the_United_States";

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// GET the presidents page with [`FETCH_TIMEOUT`].
pub fn fetch_presidents_html(url: &str, user_agent: &str, from: &str) -> Result<String> {
    fetch_with_timeout(url, user_agent, from, FETCH_TIMEOUT)
}

/// Non-2xx statuses and timeouts are errors; there is no retry.
#[instrument(level = "info", skip(user_agent, from))]
pub fn fetch_with_timeout(
    url: &str,
    user_agent: &str,
    from: &str,
    timeout: Duration,
) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| WrangleError::InvalidConfig(format!("{url}: {e}")))?;
    let fetch_err = |source| WrangleError::Fetch {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(fetch_err)?;
    debug!("sending request");
    let resp = client
        .get(parsed)
        .header(USER_AGENT, user_agent)
        .header(FROM, from)
        .send()
        .map_err(fetch_err)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(WrangleError::FetchStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let body = resp.text().map_err(fetch_err)?;
    info!(bytes = body.len(), "fetched presidents page");
    Ok(body)
}
