use meowlogy_utils::validation::{validate_fact, validate_fact_id};
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    client::{ApiClient, read_json},
    error::ApiError,
    model::{ActionResponse, AddFactResponse, Fact, HealthStatus},
    payload::FactListPayload,
};

impl ApiClient {
    /// `GET /catfacts`, accepting either the wrapped or the bare list shape.
    pub async fn list_facts(&self) -> Result<Vec<Fact>, ApiError> {
        let response = self.send(self.http().get(self.url("/catfacts"))).await?;
        let value: Value = read_json(response, "Failed to fetch cat facts.").await?;
        let facts = FactListPayload::classify(value).into_facts()?;

        debug!(count = facts.len(), "fetched cat facts");
        Ok(facts)
    }

    pub async fn random_fact(&self) -> Result<Fact, ApiError> {
        let response = self
            .send(self.http().get(self.url("/catfacts/random")))
            .await?;
        read_json(response, "Failed to fetch random fact.").await
    }

    /// `POST /catfacts` with the trimmed text as form field `fact`. Blank text
    /// is rejected here and never reaches the network.
    pub async fn add_fact(&self, text: &str) -> Result<AddFactResponse, ApiError> {
        let fact = validate_fact(text)?;
        let response = self
            .send(
                self.http()
                    .post(self.url("/catfacts"))
                    .form(&[("fact", fact.as_str())]),
            )
            .await?;

        let created: AddFactResponse =
            read_json(response, "Failed to add fact. Please try again.").await?;
        info!(status = %created.status, "submitted cat fact");
        Ok(created)
    }

    pub async fn fact_by_id(&self, id: &str) -> Result<Fact, ApiError> {
        let id = validate_fact_id(id)?;
        let response = self
            .send(self.http().get(self.url(&format!("/catfacts/{}", id))))
            .await?;
        read_json(response, "Fact not found").await
    }

    pub async fn like_fact(&self, id: &str) -> Result<ActionResponse, ApiError> {
        let id = validate_fact_id(id)?;
        let response = self
            .send(self.http().post(self.url(&format!("/catfacts/{}/like", id))))
            .await?;
        read_json(response, "Failed to like fact").await
    }

    pub async fn unlike_fact(&self, id: &str) -> Result<ActionResponse, ApiError> {
        let id = validate_fact_id(id)?;
        let response = self
            .send(self.http().delete(self.url(&format!("/catfacts/{}/like", id))))
            .await?;
        read_json(response, "Failed to unlike fact").await
    }

    pub async fn delete_fact(&self, id: &str) -> Result<ActionResponse, ApiError> {
        let id = validate_fact_id(id)?;
        let response = self
            .send(self.http().delete(self.url(&format!("/catfacts/{}", id))))
            .await?;
        read_json(response, "Failed to delete fact").await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self.send(self.http().get(self.url("/health"))).await?;
        read_json(response, "Health check failed").await
    }
}
