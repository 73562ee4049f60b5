use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{CiQosError, Result};

const API_VERSION: &str = "2022-11-28";

pub struct GitHubClient {
    pub client: Client,
    pub api_url: Url,
    pub token: Option<Token>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: Option<Token>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ciqos/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CiQosError::Config(format!("Failed to create HTTP client: {e}")))?;

        // `join` replaces the last segment unless the base ends with a slash
        let base = format!("{}/", base_url.trim_end_matches('/'));
        let api_url = Url::parse(&base)
            .map_err(|e| CiQosError::Config(format!("Invalid base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| CiQosError::Config(format!("Invalid endpoint URL '{path}': {e}")))
    }

    /// Sends a GET and decodes the body, turning 404 into `None`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let request = self.auth_request(self.client.get(url).query(query));
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CiQosError::Api(format!("{status} - {body}")));
        }

        Ok(Some(response.json::<T>().await?))
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        let resource = url.path().to_string();
        self.get_optional(url, query)
            .await?
            .ok_or_else(|| CiQosError::Api(format!("Resource not found: {resource}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_onto_base() {
        let client = GitHubClient::new("https://api.github.com", None).unwrap();

        assert_eq!(
            client.endpoint("orgs/acme/repos").unwrap().as_str(),
            "https://api.github.com/orgs/acme/repos"
        );
    }

    #[test]
    fn test_endpoint_keeps_enterprise_prefix() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3/", None).unwrap();

        assert_eq!(
            client.endpoint("repos/acme/api/actions/runs").unwrap().as_str(),
            "https://ghe.example.com/api/v3/repos/acme/api/actions/runs"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let result = GitHubClient::new("not a url", None);

        assert!(matches!(result, Err(CiQosError::Config(_))));
    }
}
