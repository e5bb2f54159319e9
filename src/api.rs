// API client module: talks to the secureshare web service through its HTML
// form. Every operation is two blocking round-trips on a fresh cookie
// session: GET a page to pick up the anti-forgery token and the session
// cookie, then POST the form back.

use std::fmt;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ShareError};
use crate::html;

/// Public secureshare deployment.
pub const DEFAULT_BASE_URL: &str = "https://secureshare.support/";

/// Requested lifespan of a share. Non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ttl {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
}

impl Default for Ttl {
    fn default() -> Self {
        Ttl {
            days: 7,
            hours: 0,
            minutes: 0,
        }
    }
}

/// Everything needed to create a share.
#[derive(Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub secret: String,
    pub password: Option<String>,
    pub ttl: Ttl,
}

impl ShareRequest {
    pub fn new(secret: impl Into<String>) -> Self {
        ShareRequest {
            secret: secret.into(),
            password: None,
            ttl: Ttl::default(),
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password;
        self
    }

    pub fn with_ttl(mut self, ttl: Ttl) -> Self {
        self.ttl = ttl;
        self
    }
}

impl fmt::Debug for ShareRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareRequest")
            .field("secret", &"..")
            .field("password", &self.password.as_ref().map(|_| ".."))
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Opaque link returned by the service. Kept exactly as the page gave it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink(String);

impl ShareLink {
    pub fn new(link: impl Into<String>) -> Self {
        ShareLink(link.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Plaintext behind a link. Only ever printed, never stored or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct RevealedSecret(String);

impl RevealedSecret {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RevealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RevealedSecret(..)")
    }
}

impl fmt::Display for RevealedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What to do with the single command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reveal(ShareLink),
    Create(String),
}

#[derive(Serialize)]
struct CreateForm<'a> {
    #[serde(rename = "csrfmiddlewaretoken")]
    token: &'a str,
    secret: &'a str,
    password: &'a str,
    ttl_days: u32,
    ttl_hours: u32,
    ttl_minutes: u32,
}

#[derive(Serialize)]
struct RevealForm<'a> {
    #[serde(rename = "csrfmiddlewaretoken")]
    token: &'a str,
    cont: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

/// Client for one secureshare deployment. Holds configuration only; the
/// HTTP session lives for the duration of a single `create` or `reveal`.
#[derive(Debug, Clone)]
pub struct ShareClient {
    base_url: Url,
    link_pattern: Regex,
}

impl ShareClient {
    /// Build a client for `base_url`. A missing trailing slash is added so
    /// that links resolve to `<base>secret/...`.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url)
            .map_err(|e| ShareError::Usage(format!("invalid base URL {base_url}: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let link_pattern = Regex::new(&format!("^{}secret/", regex::escape(url.as_str())))
            .map_err(|e| ShareError::Usage(format!("invalid base URL {base_url}: {e}")))?;

        Ok(ShareClient {
            base_url: url,
            link_pattern,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Decide between reveal and create. Never rejects: anything that is
    /// not a share link of this deployment is secret text.
    pub fn dispatch(&self, argument: &str) -> Action {
        if self.link_pattern.is_match(argument) {
            Action::Reveal(ShareLink::new(argument))
        } else {
            Action::Create(argument.to_string())
        }
    }

    /// Cookie-keeping session with the fixed Referer header.
    fn session(&self) -> Result<Client> {
        let mut headers = HeaderMap::new();
        let referer = HeaderValue::from_str(self.base_url.as_str())
            .map_err(|e| ShareError::Usage(format!("base URL is not a valid header: {e}")))?;
        headers.insert(REFERER, referer);

        Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| ShareError::Network(format!("failed to build HTTP client: {e}")))
    }

    /// Submit a secret and return the share link the service hands back.
    pub fn create(&self, request: &ShareRequest) -> Result<ShareLink> {
        if request.secret.is_empty() {
            return Err(ShareError::Usage("secret text must not be empty".into()));
        }

        let session = self.session()?;
        let url = self.base_url.as_str();

        debug!(url, "fetching landing page");
        let page = get_page(&session, url)?;
        let token = html::anti_forgery_token(&page)?;

        let form = CreateForm {
            token: &token,
            secret: &request.secret,
            password: request.password.as_deref().unwrap_or(""),
            ttl_days: request.ttl.days,
            ttl_hours: request.ttl.hours,
            ttl_minutes: request.ttl.minutes,
        };
        debug!(
            url,
            ttl_days = form.ttl_days,
            ttl_hours = form.ttl_hours,
            ttl_minutes = form.ttl_minutes,
            protected = request.password.is_some(),
            "submitting secret"
        );
        let response = post_form(&session, url, &form)?;

        let link = ShareLink::new(html::first_link(&response)?);
        info!("share link created");
        Ok(link)
    }

    /// Consume a share link and return the secret behind it.
    pub fn reveal(&self, link: &ShareLink, password: Option<&str>) -> Result<RevealedSecret> {
        let session = self.session()?;

        debug!(link = link.as_str(), "fetching share page");
        let page = get_page(&session, link.as_str())?;
        let token = html::anti_forgery_token(&page)?;

        let form = RevealForm {
            token: &token,
            cont: "on",
            password,
        };
        debug!(link = link.as_str(), "confirming reveal");
        let response = post_form(&session, link.as_str(), &form)?;

        let markup = html::first_textarea(&response)?;
        info!("secret revealed");
        Ok(RevealedSecret(html::strip_tags(&markup)))
    }
}

fn get_page(session: &Client, url: &str) -> Result<String> {
    let res = session.get(url).send()?.error_for_status()?;
    Ok(res.text()?)
}

fn post_form<T: Serialize>(session: &Client, url: &str, form: &T) -> Result<String> {
    let res = session.post(url).form(form).send()?.error_for_status()?;
    Ok(res.text()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShareClient {
        ShareClient::new(DEFAULT_BASE_URL).unwrap()
    }

    #[test]
    fn links_of_the_service_are_revealed() {
        let link = "https://secureshare.support/secret/abc123/";
        assert_eq!(client().dispatch(link), Action::Reveal(ShareLink::new(link)));
    }

    #[test]
    fn everything_else_is_created() {
        for text in [
            "hello",
            "",
            "https://secureshare.support/",
            "https://secureshare.support/about/",
            "https://other.example/secret/abc",
            "see https://secureshare.support/secret/abc",
            "https://secureshare-support/secret/abc",
        ] {
            assert_eq!(client().dispatch(text), Action::Create(text.to_string()));
        }
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ShareClient::new("http://127.0.0.1:8080/share").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080/share/");
        assert!(matches!(
            client.dispatch("http://127.0.0.1:8080/share/secret/x"),
            Action::Reveal(_)
        ));
    }

    #[test]
    fn invalid_base_url_is_usage_error() {
        assert!(matches!(ShareClient::new("not a url"), Err(ShareError::Usage(_))));
    }

    #[test]
    fn empty_secret_is_rejected_before_any_request() {
        let err = client().create(&ShareRequest::new("")).unwrap_err();
        assert!(matches!(err, ShareError::Usage(_)));
    }

    #[test]
    fn default_ttl_is_a_week() {
        assert_eq!(
            ShareRequest::new("x").ttl,
            Ttl {
                days: 7,
                hours: 0,
                minutes: 0
            }
        );
    }

    #[test]
    fn create_form_field_names() {
        let form = CreateForm {
            token: "T1",
            secret: "hello world",
            password: "",
            ttl_days: 7,
            ttl_hours: 0,
            ttl_minutes: 30,
        };
        assert_eq!(
            serde_urlencoded_like(&form),
            "csrfmiddlewaretoken=T1&secret=hello+world&password=&ttl_days=7&ttl_hours=0&ttl_minutes=30"
        );
    }

    #[test]
    fn reveal_form_omits_absent_password() {
        let form = RevealForm {
            token: "T2",
            cont: "on",
            password: None,
        };
        assert_eq!(serde_urlencoded_like(&form), "csrfmiddlewaretoken=T2&cont=on");
    }

    #[test]
    fn share_request_debug_hides_secret_and_password() {
        let request = ShareRequest::new("hunter2").with_password(Some("pw-9f3".into()));
        let shown = format!("{request:?}");
        assert!(!shown.contains("hunter2"), "{shown}");
        assert!(!shown.contains("pw-9f3"), "{shown}");
        assert!(shown.contains("days: 7"), "{shown}");
    }

    #[test]
    fn revealed_secret_debug_is_redacted() {
        let secret = RevealedSecret("hunter2".into());
        assert_eq!(format!("{secret:?}"), "RevealedSecret(..)");
        assert_eq!(secret.to_string(), "hunter2");
    }

    // Encodes a form the same way reqwest does for `.form()`.
    fn serde_urlencoded_like<T: Serialize>(form: &T) -> String {
        let req = Client::new()
            .post("http://localhost/")
            .form(form)
            .build()
            .unwrap();
        let body = req.body().and_then(|b| b.as_bytes()).unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}
