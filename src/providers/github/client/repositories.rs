use serde::Deserialize;

use super::core::GitHubClient;
use crate::error::Result;

#[derive(Debug, Deserialize)]
pub struct RepositoryDto {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub archived: bool,
}

impl GitHubClient {
    /// Fetch a page of an organization's repositories
    pub async fn fetch_repositories_page(
        &self,
        owner: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositoryDto>> {
        let url = self.endpoint(&format!("orgs/{owner}/repos"))?;

        self.get(
            url,
            &[
                ("type", "all".to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CiQosError;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_fetch_repositories_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/orgs/acme/repos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("per_page".into(), "50".into()),
            ]))
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "api", "full_name": "acme/api", "archived": false},
                    {"name": "legacy", "full_name": "acme/legacy", "archived": true},
                    {"name": "web", "full_name": "acme/web"}
                ]"#,
            )
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), Some("ghp_test".into())).unwrap();
        let repositories = client.fetch_repositories_page("acme", 2, 50).await.unwrap();

        mock.assert_async().await;
        assert_eq!(repositories.len(), 3);
        assert_eq!(repositories[0].full_name, "acme/api");
        assert!(repositories[1].archived);
        assert!(!repositories[2].archived);
    }

    #[tokio::test]
    async fn test_missing_organization_is_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/orgs/ghost/repos")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let result = client.fetch_repositories_page("ghost", 1, 100).await;

        assert!(matches!(result, Err(CiQosError::Api(_))));
    }

    #[tokio::test]
    async fn test_server_error_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/orgs/acme/repos")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = GitHubClient::new(&server.url(), None).unwrap();
        let Err(CiQosError::Api(message)) = client.fetch_repositories_page("acme", 1, 100).await
        else {
            panic!("expected an API error");
        };

        assert!(message.contains("502"));
        assert!(message.contains("bad gateway"));
    }
}
