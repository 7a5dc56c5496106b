use crate::domain::{ActionPlan, ApiError, BattleApi, BattleSnapshot, StartedBattle};
use crate::interface_adapters::protocol::{
    ErrorResponse, ResolveRoundResponse, StartBattleRequest, StartBattleResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

// Thin reqwest client for the battle server API.
#[derive(Clone)]
pub struct BattleHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl BattleHttpClient {
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // Sends the request and turns non-success statuses into upstream errors,
    // keeping the server's message when it sent one.
    async fn send(request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|payload| payload.message);
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

#[async_trait]
impl BattleApi for BattleHttpClient {
    async fn start_battle(&self, enemy_names: &[String]) -> Result<StartedBattle, ApiError> {
        let url = self.endpoint("/api/battle/start");
        let response =
            Self::send(self.http.post(url).json(&StartBattleRequest { enemy_names })).await?;
        let body: StartBattleResponse = Self::decode(response).await?;
        body.state.validate().map_err(ApiError::Decode)?;

        Ok(StartedBattle {
            battle_id: body.battle_id,
            snapshot: body.state,
        })
    }

    async fn submit_plan(&self, battle_id: &str, plan: &ActionPlan) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/api/battle/{battle_id}/plan"));
        // The acknowledgement body carries nothing the client needs.
        Self::send(self.http.post(url).json(plan)).await?;
        Ok(())
    }

    async fn resolve_round(&self, battle_id: &str) -> Result<BattleSnapshot, ApiError> {
        let url = self.endpoint(&format!("/api/battle/{battle_id}/resolve"));
        let response = Self::send(self.http.post(url)).await?;
        let body: ResolveRoundResponse = Self::decode(response).await?;
        body.state.validate().map_err(ApiError::Decode)?;
        Ok(body.state)
    }
}
