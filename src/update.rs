//! Release update check.
//!
//! On startup the panel can query crates.io for a newer published version and
//! surface it to the user. The check is a single GET with no retry; failures
//! propagate to the caller.

use crate::version;
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use ureq::Agent;

/// Information about an available update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateInfo {
    /// Version this build reports.
    pub current_version: String,
    /// Latest version published on crates.io.
    pub latest_version: String,
}

#[derive(Debug, Deserialize)]
struct CratesIoResponse {
    #[serde(rename = "crate")]
    krate: CratesIoCrate,
}

#[derive(Debug, Deserialize)]
struct CratesIoCrate {
    max_version: String,
}

/// Check crates.io to see if a newer version is available.
///
/// Returns `Ok(Some(UpdateInfo))` if an update exists, or `Ok(None)` if not.
/// A published version string the comparator cannot parse reads as
/// not-greater, so it reports no update rather than failing.
///
/// # Errors
///
/// Returns an error if the HTTP request fails or the response cannot be
/// parsed.
pub fn check_for_update() -> Result<Option<UpdateInfo>> {
    let url = format!("https://crates.io/api/v1/crates/{}", env!("CARGO_PKG_NAME"));
    check_for_update_impl(&url, env!("CARGO_PKG_VERSION"))
}

/// Internal implementation that allows injecting the URL and current version
/// for testing.
fn check_for_update_impl(url: &str, current_version: &str) -> Result<Option<UpdateInfo>> {
    // One check at startup, no timeout: a hung request hangs the check.
    let agent = Agent::new_with_defaults();
    let user_agent = format!("tickform/{current_version}");

    let response = match agent.get(url).header("User-Agent", user_agent).call() {
        Ok(response) => response,
        Err(ureq::Error::StatusCode(status)) => {
            return Err(anyhow!(
                "crates.io update check failed with status {status}"
            ));
        }
        Err(err) => {
            return Err(anyhow!(err)).context("Failed to query crates.io for tickform updates");
        }
    };

    let body: CratesIoResponse = response
        .into_body()
        .read_json()
        .context("Failed to deserialize crates.io response")?;

    if version::is_greater(&body.krate.max_version, current_version) {
        Ok(Some(UpdateInfo {
            current_version: current_version.to_string(),
            latest_version: body.krate.max_version,
        }))
    } else {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mock_crates_response(version: &str) -> String {
        format!(r#"{{"crate":{{"max_version":"{version}"}}}}"#)
    }

    #[test]
    fn test_update_available() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_crates_response("99.0.0"))
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        let info = result.ok().flatten();
        assert_eq!(
            info,
            Some(UpdateInfo {
                current_version: "1.0.0".to_string(),
                latest_version: "99.0.0".to_string(),
            })
        );
    }

    #[test]
    fn test_no_update_same_version() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_crates_response("1.0.0"))
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        assert!(result.is_ok());
        assert!(result.ok().flatten().is_none());
    }

    #[test]
    fn test_no_update_older_version() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_crates_response("0.9.0"))
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        assert!(result.is_ok());
        assert!(result.ok().flatten().is_none());
    }

    #[test]
    fn test_http_error() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(500)
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        assert!(result.is_err());
        if let Err(err) = result {
            assert!(err.to_string().contains("500"));
        }
    }

    #[test]
    fn test_invalid_json() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not valid json")
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        assert!(result.is_err());
    }

    #[test]
    fn test_unparseable_remote_version_reports_no_update() {
        let mut server = mockito::Server::new();
        let url = format!("{}/api/v1/crates/tickform", server.url());
        let mock = server
            .mock("GET", "/api/v1/crates/tickform")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(mock_crates_response("not-a-version"))
            .create();

        let result = check_for_update_impl(&url, "1.0.0");
        mock.assert();
        drop(server);

        // The comparator's fall-through quirk makes the bad version compare
        // not-greater; the caller cannot tell it apart from "up to date".
        assert!(result.is_ok());
        assert!(result.ok().flatten().is_none());
    }

    #[test]
    fn test_update_info_clone_and_eq() {
        let info = UpdateInfo {
            current_version: "1.0.0".to_string(),
            latest_version: "2.0.0".to_string(),
        };
        assert_eq!(info.clone(), info);
    }
}
