use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::projects::{ProjectsApi, ProjectsClient};

const SECRET_HEADER: &str = "secret";
const SESSION_COOKIE: &str = "sid";

/// Connection parameters for the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub api_base_url: String,
    pub api_key: String,
    pub secret: String,
    pub api_cookie: String,
}

impl Options {
    pub fn validate(&self) -> bool {
        !self.api_base_url.is_empty()
            && !self.api_cookie.is_empty()
            && (!self.api_key.is_empty() || !self.secret.is_empty())
    }

    /// Value sent in the `secret` header, preferring `secret` over `api_key`.
    fn secret_value(&self) -> &str {
        if self.secret.is_empty() {
            &self.api_key
        } else {
            &self.secret
        }
    }
}

/// Authenticated JSON transport shared by every resource client.
#[derive(Debug)]
pub struct JsonClient {
    http: Client,
    base_url: Url,
}

impl JsonClient {
    pub fn new(base_url: &str, secret: &str, cookie: &str) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let mut headers = HeaderMap::new();
        let secret = HeaderValue::from_str(secret)
            .map_err(|e| ApiError::CreateClient(format!("invalid secret header: {e}")))?;
        headers.insert(SECRET_HEADER, secret);

        if cookie.contains(';') || HeaderValue::from_str(cookie).is_err() {
            return Err(ApiError::CreateClient(format!(
                "invalid {SESSION_COOKIE} cookie value {cookie:?}"
            )));
        }
        let jar = Jar::default();
        jar.add_cookie_str(&format!("{SESSION_COOKIE}={cookie}"), &base_url);

        let http = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::new(jar))
            .build()
            .map_err(|e| ApiError::CreateClient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;

        debug!(%url, "GET");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(ApiError::Http {
                method: "GET".to_string(),
                url: url.to_string(),
                status: status.as_u16(),
                body: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Generic(e.to_string()))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    if !raw.ends_with('/') {
        return Err(ApiError::InvalidBaseUrl(format!(
            "BaseURL must have a trailing slash, but {raw:?} does not"
        )));
    }

    let url = Url::parse(raw)
        .map_err(|e| ApiError::InvalidBaseUrl(format!("invalid BaseURL {raw:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl(format!(
            "BaseURL {raw:?} is not an absolute URL"
        )));
    }
    Ok(url)
}

/// Typed client for the backend, one per command invocation.
pub struct MiaClient {
    pub projects: Box<dyn ProjectsApi>,
}

impl MiaClient {
    /// Validates `opts` and builds the transport. No request is sent here.
    pub fn new(opts: &Options) -> Result<Self, ApiError> {
        if !opts.validate() {
            return Err(ApiError::CreateClient(
                "client options are not correct".to_string(),
            ));
        }

        let transport = JsonClient::new(&opts.api_base_url, opts.secret_value(), &opts.api_cookie)?;

        Ok(Self {
            projects: Box::new(ProjectsClient::new(Arc::new(transport))),
        })
    }
}

/// Something able to build a [`MiaClient`] out of [`Options`].
pub trait ClientCreator {
    fn create(&self, opts: &Options) -> Result<MiaClient, ApiError>;
}

pub struct SdkClientCreator;

impl ClientCreator for SdkClientCreator {
    fn create(&self, opts: &Options) -> Result<MiaClient, ApiError> {
        MiaClient::new(opts)
    }
}

impl<F> ClientCreator for F
where
    F: Fn(&Options) -> Result<MiaClient, ApiError>,
{
    fn create(&self, opts: &Options) -> Result<MiaClient, ApiError> {
        self(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn valid_options() -> Options {
        Options {
            api_base_url: "http://my-url/path/".to_string(),
            secret: "my secret".to_string(),
            api_cookie: "my-random-sid".to_string(),
            ..Options::default()
        }
    }

    #[test]
    fn test_validate() {
        assert!(valid_options().validate());
        assert!(Options {
            secret: String::new(),
            api_key: "key".to_string(),
            ..valid_options()
        }
        .validate());
    }

    #[test]
    fn test_new_rejects_incomplete_options() {
        let cases = [
            Options::default(),
            Options {
                secret: "sid=asd".into(),
                api_base_url: "base".into(),
                ..Options::default()
            },
            Options {
                api_base_url: "base".into(),
                api_cookie: "cookie".into(),
                ..Options::default()
            },
            Options {
                api_cookie: "cookie".into(),
                secret: "sid=asd".into(),
                ..Options::default()
            },
        ];

        for opts in cases {
            assert!(!opts.validate());
            match MiaClient::new(&opts) {
                Err(err) => {
                    assert!(err.is(ErrorKind::CreateClient));
                    assert_eq!(
                        err.to_string(),
                        "error creating client: client options are not correct"
                    );
                }
                Ok(_) => panic!("expected error for {opts:?}"),
            }
        }
    }

    #[test]
    fn test_new_rejects_base_url_without_trailing_slash() {
        let opts = Options {
            api_base_url: "this-url-does-not-exist".to_string(),
            ..valid_options()
        };
        match MiaClient::new(&opts) {
            Err(err) => assert_eq!(
                err.to_string(),
                "BaseURL must have a trailing slash, but \"this-url-does-not-exist\" does not"
            ),
            Ok(_) => panic!("expected base url error"),
        }
    }

    #[test]
    fn test_new_rejects_relative_base_url() {
        let opts = Options {
            api_base_url: "relative/path/".to_string(),
            ..valid_options()
        };
        let err = MiaClient::new(&opts).err().expect("expected error");
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_new_does_not_touch_the_network() {
        // Nothing listens on this host; construction must still succeed.
        let opts = Options {
            api_base_url: "http://unreachable.invalid/".to_string(),
            ..valid_options()
        };
        assert!(MiaClient::new(&opts).is_ok());
    }

    #[test]
    fn test_new_rejects_unsendable_cookie() {
        for cookie in ["x;y", "line\nbreak"] {
            let opts = Options {
                api_cookie: cookie.to_string(),
                ..valid_options()
            };
            let err = MiaClient::new(&opts).err().expect("expected error");
            assert!(err.is(ErrorKind::CreateClient));
            assert!(err.to_string().starts_with("error creating client: invalid sid cookie"));
        }
    }

    #[test]
    fn test_secret_preferred_over_api_key() {
        let opts = Options {
            api_key: "key".to_string(),
            ..valid_options()
        };
        assert_eq!(opts.secret_value(), "my secret");
        let opts = Options {
            secret: String::new(),
            api_key: "key".to_string(),
            ..valid_options()
        };
        assert_eq!(opts.secret_value(), "key");
    }

    #[test]
    fn test_closure_is_a_client_creator() {
        let creator = |_: &Options| -> Result<MiaClient, ApiError> {
            Err(ApiError::Generic("boom".to_string()))
        };
        let err = creator.create(&valid_options()).err().expect("error");
        assert!(err.is(ErrorKind::Generic));
    }
}
