//! Azure CLI credential source.
//!
//! Shells out to `az account get-access-token` and reuses whatever identity
//! the operator's CLI session holds. Nothing is cached here; the CLI manages
//! its own token store.

use std::process::{Command, Stdio};
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use secrecy::SecretString;
use serde::Deserialize;

use crate::authorizer::{AuthorizerHandle, BearerAuthorizer};
use crate::defaults;
use crate::error::SourceError;
use crate::sources::CredentialSource;
use crate::token::AccessToken;

const SOURCE_NAME: &str = "cli";

/// Local timestamp format used by older CLI releases in `expiresOn`.
const EXPIRES_ON_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Resolves credentials by invoking the Azure CLI.
pub struct CliCredentialSource {
    program: String,
}

impl CliCredentialSource {
    pub fn new() -> Self {
        Self {
            program: defaults::cli::PROGRAM.to_string(),
        }
    }

    /// Overrides the program to invoke, e.g. `az.cmd` or a test stub.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn run(&self, resource: &str) -> Result<String, SourceError> {
        tracing::debug!(
            target: "azauth::source",
            program = %self.program,
            resource = %resource,
            "invoking CLI for access token"
        );
        let output = Command::new(&self.program)
            .args([
                "account",
                "get-access-token",
                "--resource",
                resource,
                "--output",
                "json",
            ])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                SourceError::new(SOURCE_NAME, format!("failed to run '{}': {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::new(
                SOURCE_NAME,
                format!(
                    "'{} account get-access-token' failed ({}): {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| SourceError::new(SOURCE_NAME, format!("CLI output was not UTF-8: {e}")))
    }
}

impl Default for CliCredentialSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialSource for CliCredentialSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn resolve(&self, resource: &str) -> Result<AuthorizerHandle, SourceError> {
        let raw = self.run(resource)?;
        let access_token = parse_token_output(&raw)?;
        Ok(Arc::new(BearerAuthorizer::from_access_token(
            access_token,
            resource,
            SOURCE_NAME,
        )))
    }
}

/// Token document printed by `az account get-access-token --output json`.
///
/// Newer CLI releases add `expires_on` as unix seconds; older ones only emit
/// `expiresOn`, a naive timestamp in the machine's local time zone.
#[derive(Debug, Deserialize)]
struct CliTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: SecretString,
    #[serde(rename = "tokenType", default)]
    token_type: Option<String>,
    #[serde(rename = "expires_on", default)]
    expires_on: Option<i64>,
    #[serde(rename = "expiresOn", default)]
    expires_on_local: Option<String>,
}

impl CliTokenResponse {
    fn expiry(&self) -> Option<DateTime<Utc>> {
        if let Some(secs) = self.expires_on
            && let Some(expiry) = DateTime::from_timestamp(secs, 0)
        {
            return Some(expiry);
        }
        let raw = self.expires_on_local.as_deref()?;
        let naive = NaiveDateTime::parse_from_str(raw, EXPIRES_ON_FORMAT).ok()?;
        Local
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc))
    }
}

fn parse_token_output(raw: &str) -> Result<AccessToken, SourceError> {
    // az on Windows may prefix its output with a UTF-8 BOM.
    let raw = raw.trim_start_matches('\u{feff}');
    let response: CliTokenResponse = serde_json::from_str(raw).map_err(|e| {
        SourceError::new(SOURCE_NAME, format!("unexpected CLI token output: {e}"))
    })?;
    let expires_on = response.expiry();
    Ok(AccessToken {
        token: response.access_token,
        token_type: response
            .token_type
            .unwrap_or_else(|| defaults::auth::TOKEN_TYPE.to_string()),
        expires_on,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn parses_output_with_unix_expiry() {
        let raw = r#"{
            "accessToken": "cli-token",
            "expiresOn": "2026-08-23 11:03:18.000000",
            "expires_on": 1787655798,
            "subscription": "8442f744-19f3-4b8a-8b70-c76b8b6ba185",
            "tenant": "c9b3b0b2-7e01-4e5f-8346-a9e07d3d2d9b",
            "tokenType": "Bearer"
        }"#;
        let token = parse_token_output(raw).unwrap();
        assert_eq!(token.token.expose_secret(), "cli-token");
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_on, DateTime::from_timestamp(1_787_655_798, 0));
    }

    #[test]
    fn parses_output_with_local_expiry_only() {
        let raw = r#"{
            "accessToken": "cli-token",
            "expiresOn": "2026-08-23 11:03:18.000000",
            "tokenType": "Bearer"
        }"#;
        let token = parse_token_output(raw).unwrap();
        let naive =
            NaiveDateTime::parse_from_str("2026-08-23 11:03:18.000000", EXPIRES_ON_FORMAT).unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.with_timezone(&Utc));
        assert_eq!(token.expires_on, expected);
    }

    #[test]
    fn tolerates_a_leading_bom() {
        let raw = "\u{feff}{\"accessToken\": \"cli-token\"}";
        let token = parse_token_output(raw).unwrap();
        assert_eq!(token.token.expose_secret(), "cli-token");
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_on.is_none());
    }

    #[test]
    fn rejects_non_token_output() {
        let err = parse_token_output("Please run 'az login' to setup account.").unwrap_err();
        assert_eq!(err.source, "cli");
        assert!(err.reason.contains("unexpected CLI token output"));
    }

    #[test]
    fn unspawnable_program_is_a_source_error() {
        let source = CliCredentialSource::new().with_program("azauth-no-such-binary");
        let err = source.resolve("https://management.azure.com/").unwrap_err();
        assert_eq!(err.source, "cli");
        assert!(err.reason.contains("azauth-no-such-binary"));
    }
}
