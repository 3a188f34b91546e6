use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, instrument};

use crate::error::{MailProbeError, Result};
use crate::extract;
use crate::status::{Status, StatusId};

const SIGNUP_URL: &str = "https://signup.live.com/signup";
const CHECK_AVAILABLE_URL: &str = "https://signup.live.com/API/CheckAvailableSigninNames";

const AMSC_COOKIE_PATTERN: &str = r"(?s)amsc=(.*?);";
const SERVER_DATA_PATTERN: &str = r"(?s)var ServerData=(.*?);";

#[derive(Debug, Deserialize)]
struct ServerData {
    #[serde(rename = "apiCanary", default)]
    api_canary: String,
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(rename = "isAvailable")]
    is_available: bool,
}

/// Session artifacts harvested from the signup page, consumed by exactly
/// one availability call.
#[derive(Debug)]
struct SignupSession {
    amsc: String,
    canary: String,
}

/// Probe for Microsoft accounts (hotmail.com, outlook.com, live.com).
///
/// Emulates the public signup flow: fetch the signup page for an `amsc`
/// cookie and the page-embedded `ServerData` canary, then ask the
/// availability endpoint about the address.
#[derive(Debug, Clone)]
pub struct MicrosoftProbe {
    http: Client,
    signup_url: String,
    availability_url: String,
}

impl MicrosoftProbe {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            signup_url: SIGNUP_URL.to_string(),
            availability_url: CHECK_AVAILABLE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_endpoints(http: Client, signup_url: String, availability_url: String) -> Self {
        Self {
            http,
            signup_url,
            availability_url,
        }
    }

    /// Check whether `email` is registered with Microsoft.
    ///
    /// Only `Live`, `NotExists` and `CheckError` are reachable from this
    /// provider's flow.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn check(&self, email: &str) -> Status {
        let session = match self.harvest_session().await {
            Ok(session) => session,
            Err(e) => {
                error!(error = %e, "signup session harvest failed");
                return Status::from(StatusId::CheckError);
            }
        };

        match self.query_availability(email, &session).await {
            Ok(true) => Status::from(StatusId::NotExists),
            Ok(false) => Status::from(StatusId::Live),
            Err(e) => {
                error!(error = %e, "availability request failed");
                Status::from(StatusId::CheckError)
            }
        }
    }

    async fn harvest_session(&self) -> Result<SignupSession> {
        let res = self.http.get(&self.signup_url).send().await?;

        let amsc = res
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| extract::capture(value, AMSC_COOKIE_PATTERN))
            .ok_or(MailProbeError::AmscCookieMissing)?;

        let html = res.text().await?;
        let canary = parse_canary(&html)?;

        debug!("harvested signup session");
        Ok(SignupSession { amsc, canary })
    }

    async fn query_availability(&self, email: &str, session: &SignupSession) -> Result<bool> {
        let body = serde_json::json!({
            "signInName": email,
            "includeSuggestions": true,
        });

        let res = self
            .http
            .post(&self.availability_url)
            .json(&body)
            .header("canary", &session.canary)
            .header(COOKIE, format!("amsc={};", session.amsc))
            .send()
            .await?;

        let text = res.text().await?;
        if !text.contains("isAvailable") {
            return Err(MailProbeError::UnexpectedResponse(
                "isAvailable field missing from response".to_string(),
            ));
        }

        let parsed: AvailabilityResponse = serde_json::from_str(&text)?;
        Ok(parsed.is_available)
    }
}

/// Pull the canary out of the `ServerData` blob embedded in the signup page.
///
/// A missing blob, malformed JSON and an empty canary field are the same
/// failure: no session.
fn parse_canary(html: &str) -> Result<String> {
    let raw = extract::capture(html, SERVER_DATA_PATTERN).ok_or(MailProbeError::CanaryMissing)?;
    let data: ServerData =
        serde_json::from_str(&raw).map_err(|_| MailProbeError::CanaryMissing)?;
    if data.api_canary.is_empty() {
        return Err(MailProbeError::CanaryMissing);
    }
    Ok(data.api_canary)
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::transport::{build_client, ProxyConfig, DEFAULT_TIMEOUT};

    const SIGNUP_PAGE: &str = r#"var ServerData={"apiCanary":"testCanary"};"#;

    fn probe_against(server: &MockServer) -> MicrosoftProbe {
        MicrosoftProbe::with_endpoints(
            build_client(&ProxyConfig::default(), DEFAULT_TIMEOUT).unwrap(),
            format!("{}/signup", server.uri()),
            format!("{}/API/CheckAvailableSigninNames", server.uri()),
        )
    }

    async fn mount_signup_page(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/signup"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "amsc=testCookie; path=/;")
                    .set_body_string(SIGNUP_PAGE),
            )
            .mount(server)
            .await;
    }

    #[test]
    fn parse_canary_reads_server_data() {
        assert_eq!(parse_canary(SIGNUP_PAGE).unwrap(), "testCanary");
    }

    #[test]
    fn parse_canary_rejects_malformed_json() {
        let err = parse_canary(r#"var ServerData={"apiCanary":invalidJson};"#).unwrap_err();
        assert!(matches!(err, MailProbeError::CanaryMissing));
    }

    #[test]
    fn parse_canary_rejects_missing_field() {
        let err = parse_canary("var ServerData={};").unwrap_err();
        assert!(matches!(err, MailProbeError::CanaryMissing));
    }

    #[tokio::test]
    async fn available_address_classifies_as_not_exists() {
        let server = MockServer::start().await;
        mount_signup_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/API/CheckAvailableSigninNames"))
            .and(header("canary", "testCanary"))
            .and(header("cookie", "amsc=testCookie;"))
            .and(body_string_contains("signInName"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"isAvailable":true}"#))
            .mount(&server)
            .await;

        let status = probe_against(&server).check("test@example.com").await;
        assert_eq!(status.id, StatusId::NotExists);
    }

    #[tokio::test]
    async fn taken_address_classifies_as_live() {
        let server = MockServer::start().await;
        mount_signup_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/API/CheckAvailableSigninNames"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"isAvailable":false}"#))
            .mount(&server)
            .await;

        let status = probe_against(&server).check("test@example.com").await;
        assert_eq!(status.id, StatusId::Live);
    }

    #[tokio::test]
    async fn missing_amsc_cookie_aborts_without_second_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/signup"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SIGNUP_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/API/CheckAvailableSigninNames"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"isAvailable":true}"#))
            .expect(0)
            .mount(&server)
            .await;

        let status = probe_against(&server).check("test@example.com").await;
        assert_eq!(status.id, StatusId::CheckError);
    }

    #[tokio::test]
    async fn malformed_availability_response_is_check_error() {
        let server = MockServer::start().await;
        mount_signup_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/API/CheckAvailableSigninNames"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"isAvailable":invalidJson}"#),
            )
            .mount(&server)
            .await;

        let status = probe_against(&server).check("test@example.com").await;
        assert_eq!(status.id, StatusId::CheckError);
    }

    #[tokio::test]
    async fn availability_response_without_expected_field_is_check_error() {
        let server = MockServer::start().await;
        mount_signup_page(&server).await;
        Mock::given(method("POST"))
            .and(path("/API/CheckAvailableSigninNames"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"something":"else"}"#))
            .mount(&server)
            .await;

        let status = probe_against(&server).check("test@example.com").await;
        assert_eq!(status.id, StatusId::CheckError);
    }

    #[tokio::test]
    async fn transport_failure_is_check_error() {
        let server = MockServer::start().await;
        let probe = probe_against(&server);
        drop(server);

        let status = probe.check("test@example.com").await;
        assert_eq!(status.id, StatusId::CheckError);
    }
}
