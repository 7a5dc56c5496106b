use serde::{Deserialize, Serialize};

use crate::domain::BattleSnapshot;

// Body of POST /api/battle/start.
#[derive(Debug, Serialize)]
pub struct StartBattleRequest<'a> {
    pub enemy_names: &'a [String],
}

// Reply to POST /api/battle/start.
#[derive(Debug, Deserialize)]
pub struct StartBattleResponse {
    pub battle_id: String,
    pub state: BattleSnapshot,
}

// Reply to POST /api/battle/{battle_id}/resolve.
#[derive(Debug, Deserialize)]
pub struct ResolveRoundResponse {
    pub state: BattleSnapshot,
}

// Error body of a non-success reply; servers use either key.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: Option<String>,
}
