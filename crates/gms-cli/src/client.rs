//! HTTP client for the resource endpoints, used by the list commands and
//! the dashboard.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use gms_core::list_view::ResourceApi;
use gms_db::models::{Garden, Plant};

#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?
            .error_for_status()
            .with_context(|| format!("GET {url} returned an error status"))?;
        resp.json()
            .await
            .with_context(|| format!("GET {url} returned an unreadable body"))
    }

    async fn delete_path(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.client
            .delete(&url)
            .send()
            .await
            .with_context(|| format!("DELETE {url} failed"))?
            .error_for_status()
            .with_context(|| format!("DELETE {url} returned an error status"))?;
        Ok(())
    }
}

#[async_trait]
impl ResourceApi<Garden> for HttpApi {
    async fn list(&self) -> Result<Vec<Garden>> {
        self.get_json("/gardens").await
    }

    async fn delete(&self, id: &i64) -> Result<()> {
        self.delete_path(&format!("/gardens/{id}")).await
    }
}

#[async_trait]
impl ResourceApi<Plant> for HttpApi {
    async fn list(&self) -> Result<Vec<Plant>> {
        self.get_json("/plants").await
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.delete_path(&format!("/plants/{id}")).await
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::{delete, get};
    use serde_json::json;

    use super::*;

    /// Serve `app` on an ephemeral local port and return its base URL.
    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn lists_gardens() {
        let app = Router::new().route(
            "/gardens",
            get(|| async {
                axum::Json(json!([{
                    "gardenId": 4,
                    "name": "Roof",
                    "location": "Top",
                    "description": null,
                    "dateCreated": "2024-05-01T10:00:00Z"
                }]))
            }),
        );
        let api = HttpApi::new(spawn(app).await).unwrap();

        let gardens: Vec<Garden> = ResourceApi::<Garden>::list(&api).await.unwrap();
        assert_eq!(gardens.len(), 1);
        assert_eq!(gardens[0].garden_id, 4);
        assert_eq!(gardens[0].description, None);
    }

    #[tokio::test]
    async fn delete_plant_hits_plant_path() {
        let id = Uuid::new_v4();
        let app = Router::new().route(
            "/plants/{id}",
            delete(|| async { axum::Json(json!({ "message": "Plant deleted successfully" })) }),
        );
        let api = HttpApi::new(format!("{}/", spawn(app).await)).unwrap();

        ResourceApi::<Plant>::delete(&api, &id).await.unwrap();
    }

    #[tokio::test]
    async fn server_error_on_delete_is_an_error() {
        let app = Router::new().route(
            "/gardens/{id}",
            delete(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({ "error": "Error while deleting garden 3" })),
                )
            }),
        );
        let api = HttpApi::new(spawn(app).await).unwrap();

        let err = ResourceApi::<Garden>::delete(&api, &3).await.unwrap_err();
        assert!(
            format!("{err:#}").contains("/gardens/3"),
            "unexpected error: {err:#}"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_an_error() {
        // Bind then drop so nothing is listening on the port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = HttpApi::new(format!("http://{addr}")).unwrap();
        assert!(ResourceApi::<Plant>::list(&api).await.is_err());
    }
}
