use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::models::pet::Pet;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("petstore request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("petstore returned non-success status: {0}")]
    Status(StatusCode),
}

/// Thin client for the upstream petstore API. Every call is one round
/// trip; any non-2xx response or transport error is a uniform failure
/// and callers only branch on pass/fail.
#[derive(Clone)]
pub struct PetApiClient {
    client: Client,
    base_url: String,
}

impl PetApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status(status))
        }
    }

    pub async fn list_available(&self) -> Result<Vec<Pet>, ApiError> {
        let response = self
            .client
            .get(format!("{}/pet/findByStatus", self.base_url))
            .query(&[("status", "available")])
            .send()
            .await?;
        Ok(Self::ensure_success(response)?.json().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Pet, ApiError> {
        let response = self
            .client
            .get(format!("{}/pet/{id}", self.base_url))
            .send()
            .await?;
        Ok(Self::ensure_success(response)?.json().await?)
    }

    pub async fn create(&self, pet: &Pet) -> Result<Pet, ApiError> {
        let response = self
            .client
            .post(format!("{}/pet", self.base_url))
            .json(pet)
            .send()
            .await?;
        Ok(Self::ensure_success(response)?.json().await?)
    }

    /// The petstore API takes the id in the body for updates, not the path.
    pub async fn update(&self, pet: &Pet) -> Result<Pet, ApiError> {
        let response = self
            .client
            .put(format!("{}/pet", self.base_url))
            .json(pet)
            .send()
            .await?;
        Ok(Self::ensure_success(response)?.json().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/pet/{id}", self.base_url))
            .send()
            .await?;
        Self::ensure_success(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::pet::{Category, Tag};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn sample_pet(id: Option<i64>) -> Pet {
        Pet {
            id,
            name: "Rex".to_string(),
            category: Category {
                id: 1,
                name: "Dogs".to_string(),
            },
            status: "available".to_string(),
            tags: vec![Tag {
                name: "friendly".to_string(),
            }],
            photo_urls: Vec::new(),
        }
    }

    #[tokio::test]
    async fn list_available_queries_find_by_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/pet/findByStatus")
            .match_query(Matcher::UrlEncoded(
                "status".to_string(),
                "available".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!([{"id": 1, "name": "Rex", "status": "available"}]).to_string())
            .create_async()
            .await;

        let client = PetApiClient::new(server.url());
        let pets = client.list_available().await.unwrap();

        mock.assert_async().await;
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name, "Rex");
    }

    #[tokio::test]
    async fn get_collapses_not_found_to_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/pet/42")
            .with_status(404)
            .create_async()
            .await;

        let client = PetApiClient::new(server.url());
        assert!(client.get(42).await.is_err());
    }

    #[tokio::test]
    async fn create_posts_wire_shape_and_returns_assigned_id() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pet")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "name": "Rex",
                "category": {"id": 1, "name": "Dogs"},
                "status": "available",
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 7, "name": "Rex", "status": "available"}).to_string())
            .create_async()
            .await;

        let client = PetApiClient::new(server.url());
        let created = client.create(&sample_pet(None)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(created.id, Some(7));
    }

    #[tokio::test]
    async fn update_puts_id_in_body_not_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/pet")
            .match_body(Matcher::PartialJson(json!({"id": 7, "name": "Rex"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"id": 7, "name": "Rex", "status": "available"}).to_string())
            .create_async()
            .await;

        let client = PetApiClient::new(server.url());
        let updated = client.update(&sample_pet(Some(7))).await.unwrap();

        mock.assert_async().await;
        assert_eq!(updated.id, Some(7));
    }

    #[tokio::test]
    async fn delete_needs_only_a_2xx() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/pet/7")
            .with_status(200)
            .create_async()
            .await;

        let client = PetApiClient::new(server.url());
        assert!(client.delete(7).await.is_ok());
        mock.assert_async().await;

        server
            .mock("DELETE", "/pet/8")
            .with_status(500)
            .create_async()
            .await;
        assert!(client.delete(8).await.is_err());
    }
}
