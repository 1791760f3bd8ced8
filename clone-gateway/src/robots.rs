//! Crawl-policy evaluation for remote URL sources.

use nb_core::Fetcher;
use texting_robots::Robot;

/// Computes whether a page rendered from `remote_url` may be served from
/// a shared/public cache.
///
/// The two failure branches are deliberately asymmetric: an unreachable
/// or missing robots.txt fails OPEN (absence implies crawlable), while a
/// robots.txt that fetched but cannot be evaluated fails CLOSED.
pub async fn crawl_visibility(fetcher: &dyn Fetcher, robots_url: &str, remote_url: &str) -> bool {
    // Assume non-public until the crawl policy says otherwise.
    let mut public = false;

    match fetcher.fetch(robots_url).await {
        Ok(response) => match response.text() {
            Ok(robots_txt) => match Robot::new("*", robots_txt.as_bytes()) {
                Ok(robot) => public = robot.allowed(remote_url),
                Err(err) => {
                    tracing::error!(robots_url, error = %err, "robots.txt evaluation failed");
                }
            },
            Err(err) => {
                tracing::error!(robots_url, error = %err, "robots.txt body is not UTF-8");
            }
        },
        Err(err) => {
            tracing::debug!(robots_url, error = %err, "robots.txt unavailable, assuming crawlable");
            public = true;
        }
    }

    tracing::debug!(remote_url, public, "crawl visibility computed");
    public
}
