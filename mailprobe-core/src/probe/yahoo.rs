use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::{MailProbeError, Result};
use crate::extract;
use crate::status::{Status, StatusId};

const CREATE_ACCOUNT_URL: &str = "https://login.yahoo.com/account/create";
const VALIDATE_FIELD_URL: &str =
    "https://login.yahoo.com/account/module/create?validateField=userId";

/// Field name the validation endpoint reports identifier errors under.
const USER_ID_FIELD: &str = "userId";

// Error texts the validation endpoint attaches to the userId field. The
// first three all mean the identifier is taken; the last two are input
// rejections, not registration signals.
const IDENTIFIER_EXISTS: &str = "IDENTIFIER_EXISTS";
const IDENTIFIER_NOT_AVAILABLE: &str = "IDENTIFIER_NOT_AVAILABLE";
const RESERVED_WORD_PRESENT: &str = "RESERVED_WORD_PRESENT";
const LENGTH_TOO_SHORT: &str = "LENGTH_TOO_SHORT";
const SPECIAL_CHARACTERS_NOT_ALLOWED: &str = "SOME_SPECIAL_CHARACTERS_NOT_ALLOWED";

/// Form state posted to the validation endpoint. Every field is sent, blank
/// ones included; the server expects the full signup form.
#[derive(Debug, Default, Serialize)]
struct SignupForm {
    #[serde(rename = "specId")]
    spec_id: String,
    #[serde(rename = "cacheStored")]
    cache_stored: String,
    crumb: String,
    acrumb: String,
    #[serde(rename = "googleIdToken")]
    google_id_token: String,
    #[serde(rename = "authCode")]
    auth_code: String,
    #[serde(rename = "attrSetIndex")]
    attr_set_index: String,
    #[serde(rename = "multiDomain")]
    multi_domain: String,
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName")]
    last_name: String,
    #[serde(rename = "userid-domain")]
    userid_domain: String,
    #[serde(rename = "userId")]
    user_id: String,
    password: String,
    signup: String,
    #[serde(rename = "sessionIndex")]
    session_index: String,
    tos0: String,
    #[serde(skip)]
    cookie: String,
}

#[derive(Debug, Deserialize)]
struct ValidateResponse {
    #[serde(default)]
    errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Deserialize)]
struct FieldError {
    #[serde(default)]
    name: String,
    #[serde(default)]
    error: String,
}

/// Probe for Yahoo accounts.
///
/// Emulates the account-creation flow: fetch the signup form for its
/// session cookie and anti-forgery tokens, then ask the field-validation
/// endpoint about the identifier.
#[derive(Debug, Clone)]
pub struct YahooProbe {
    http: Client,
    create_url: String,
    validate_url: String,
}

impl YahooProbe {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            create_url: CREATE_ACCOUNT_URL.to_string(),
            validate_url: VALIDATE_FIELD_URL.to_string(),
        }
    }

    /// Check whether `email` is registered with Yahoo.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn check(&self, email: &str) -> Status {
        let Some((_, domain)) = email.split_once('@') else {
            error!("invalid email format");
            return Status::from(StatusId::FormatInvalid);
        };

        let mut form = match self.harvest_form().await {
            Ok(form) => form,
            Err(e) => {
                error!(error = %e, "account page harvest failed");
                return Status::from(StatusId::CheckError);
            }
        };
        form.user_id = email.to_string();
        form.userid_domain = domain.to_string();

        match self.validate_user_id(&form).await {
            Ok(status) => status,
            Err(e) => {
                error!(error = %e, "validation request failed");
                Status::from(StatusId::CheckError)
            }
        }
    }

    async fn harvest_form(&self) -> Result<SignupForm> {
        let res = self.http.get(&self.create_url).send().await?;

        // The session cookie is the first segment of the first Set-Cookie
        // header.
        let cookie = res
            .headers()
            .get(SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
            .filter(|segment| !segment.is_empty())
            .ok_or(MailProbeError::SessionCookieMissing)?;

        let html = res.text().await?;

        let mut form = SignupForm {
            cookie,
            ..SignupForm::default()
        };
        form.acrumb = detect_value(&html, "acrumb")?;
        form.crumb = detect_value(&html, "crumb")?;
        form.session_index = detect_value(&html, "sessionIndex")?;
        form.tos0 = detect_value(&html, "tos0")?;
        form.spec_id = detect_value(&html, "specId")?;

        debug!("harvested account creation form");
        Ok(form)
    }

    async fn validate_user_id(&self, form: &SignupForm) -> Result<Status> {
        let res = self
            .http
            .post(&self.validate_url)
            .form(form)
            .header(COOKIE, &form.cookie)
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let text = res.text().await?;
        let parsed: ValidateResponse = serde_json::from_str(&text)?;
        let Some(errors) = parsed.errors else {
            return Err(MailProbeError::UnexpectedResponse(
                "errors array missing from response".to_string(),
            ));
        };

        for entry in errors.iter().filter(|e| e.name == USER_ID_FIELD) {
            match entry.error.as_str() {
                IDENTIFIER_EXISTS | IDENTIFIER_NOT_AVAILABLE | RESERVED_WORD_PRESENT => {
                    return Ok(Status::from(StatusId::Live));
                }
                LENGTH_TOO_SHORT | SPECIAL_CHARACTERS_NOT_ALLOWED => {
                    return Ok(Status::from(StatusId::CheckError));
                }
                _ => {}
            }
        }

        // No recognized userId error: the identifier is available.
        Ok(Status::from(StatusId::NotExists))
    }
}

/// Extract a named hidden-field value from the account-creation page.
fn detect_value(html: &str, name: &str) -> Result<String> {
    let pattern = format!(r#"(?m)value="(.*?)" name="{}""#, name);
    extract::capture(html, &pattern)
        .ok_or_else(|| MailProbeError::FormFieldMissing(name.to_string()))
}
