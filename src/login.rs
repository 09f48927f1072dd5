//! Manual login waiter
//!
//! Opens the login page and waits for a human to sign in. The form itself is
//! never touched; only the page URL is polled.

use std::time::Duration;

use action_primitives::PagePort;
use tracing::{debug, info};

use crate::config::LoginSettings;
use crate::errors::{JobPilotError, JobPilotResult};

/// Poll until the URL shows a signed-in page.
///
/// Returns the URL that matched a success marker.
pub async fn wait_for_manual_login(
    page: &dyn PagePort,
    settings: &LoginSettings,
) -> JobPilotResult<String> {
    page.goto(&settings.url).await?;
    info!(
        url = %settings.url,
        timeout = %humantime::format_duration(settings.timeout()),
        "Waiting for manual login"
    );

    let interval = settings.poll_interval().max(Duration::from_secs(1));
    let mut waited = Duration::ZERO;
    loop {
        let current = page.current_url().await?;
        if let Some(marker) = matched_marker(&current, &settings.success_markers) {
            info!(url = %current, marker, "Login confirmed");
            return Ok(current);
        }
        if waited >= settings.timeout() {
            return Err(JobPilotError::LoginTimeout {
                waited,
                last_url: current,
            });
        }
        debug!(url = %current, waited_secs = waited.as_secs(), "Still on the login page");
        page.wait_for_timeout(interval).await?;
        waited += interval;
    }
}

fn matched_marker<'a>(url: &str, markers: &'a [String]) -> Option<&'a str> {
    let url = url.to_lowercase();
    markers
        .iter()
        .map(|marker| marker.trim())
        .filter(|marker| !marker.is_empty())
        .find(|marker| url.contains(&marker.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_match() {
        let markers = LoginSettings::default().success_markers;
        assert_eq!(
            matched_marker("https://www.linkedin.com/feed/", &markers),
            Some("feed")
        );
        assert_eq!(matched_marker("https://www.linkedin.com/login", &markers), None);
    }
}
