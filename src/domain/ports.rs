use async_trait::async_trait;

use crate::domain::action::ActionPlan;
use crate::domain::errors::ApiError;
use crate::domain::snapshot::BattleSnapshot;

// Result of opening a new battle on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedBattle {
    pub battle_id: String,
    pub snapshot: BattleSnapshot,
}

// Use cases depend on this port, not on the HTTP client.
// Each method is exactly one round-trip to the battle authority.
#[async_trait]
pub trait BattleApi: Send + Sync {
    async fn start_battle(&self, enemy_names: &[String]) -> Result<StartedBattle, ApiError>;
    async fn submit_plan(&self, battle_id: &str, plan: &ActionPlan) -> Result<(), ApiError>;
    async fn resolve_round(&self, battle_id: &str) -> Result<BattleSnapshot, ApiError>;
}
