//! Thin HTTP client for the recetas server.

use anyhow::{bail, Context, Result};
use recetas_core::{RecipePage, StoredRecipe};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    details: Option<String>,
}

pub struct RecetasClient {
    base_url: String,
    client: Client,
}

impl RecetasClient {
    pub fn new(server: &str) -> Self {
        Self {
            base_url: server.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub async fn generate(
        &self,
        ingredients: &str,
        restrictions: Option<&str>,
        preferences: Option<&str>,
    ) -> Result<StoredRecipe> {
        let body = json!({
            "ingredients": ingredients,
            "dietaryRestrictions": restrictions.unwrap_or_default(),
            "preferences": preferences.unwrap_or_default(),
        });

        let response = self
            .client
            .post(format!("{}/api/generate-recipe", self.base_url))
            .json(&body)
            .send()
            .await
            .context("Failed to reach server")?;

        decode(response).await
    }

    pub async fn list(&self, limit: Option<u32>, cursor: Option<&str>) -> Result<RecipePage> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = self
            .client
            .get(format!("{}/api/recipes", self.base_url))
            .query(&query)
            .send()
            .await
            .context("Failed to reach server")?;

        decode(response).await
    }

    pub async fn like(&self, id: &str) -> Result<StoredRecipe> {
        let response = self
            .client
            .post(format!("{}/api/recipes/{}/like", self.base_url, id))
            .send()
            .await
            .context("Failed to reach server")?;

        decode(response).await
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .context("Failed to decode server response");
    }

    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => bail!("{} ({}): {}", error, status, details),
        Ok(ErrorBody { error, .. }) => bail!("{} ({})", error, status),
        Err(_) => bail!("Server returned {}", status),
    }
}
