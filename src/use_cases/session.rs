// Battle session: the single owner of the active battle id and its latest snapshot.

use crate::domain::{ActionPlan, ApiError, BattleApi, BattleSnapshot, TargetSide};
use std::fmt;

/// Errors returned by session operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No battle has been started yet.
    NoActiveBattle,
    /// Plans must arrive in actor order, once per actor.
    ActorOutOfOrder { expected: usize, got: usize },
    /// Actor index is past the end of the party.
    ActorOutOfRange { actor_index: usize, party_len: usize },
    /// Target index does not exist on the chosen side.
    TargetOutOfRange {
        side: TargetSide,
        target_index: usize,
        side_len: usize,
    },
    /// Resolution requested before every actor planned.
    IncompleteRound { submitted: usize, required: usize },
    /// The battle server call itself failed.
    Api(ApiError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::NoActiveBattle => write!(f, "no battle in progress"),
            SessionError::ActorOutOfOrder { expected, got } => {
                write!(f, "plan for actor {got} submitted while actor {expected} is due")
            }
            SessionError::ActorOutOfRange {
                actor_index,
                party_len,
            } => write!(
                f,
                "actor {actor_index} does not exist in a party of {party_len}"
            ),
            SessionError::TargetOutOfRange {
                side,
                target_index,
                side_len,
            } => write!(
                f,
                "target {target_index} does not exist on side {side:?} of {side_len}"
            ),
            SessionError::IncompleteRound {
                submitted,
                required,
            } => write!(
                f,
                "round has {submitted} of {required} plans and cannot be resolved"
            ),
            SessionError::Api(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<ApiError> for SessionError {
    fn from(err: ApiError) -> Self {
        SessionError::Api(err)
    }
}

#[derive(Debug, Clone)]
struct ActiveBattle {
    battle_id: String,
    snapshot: BattleSnapshot,
}

/// Mediates every round-trip with the battle server.
pub struct BattleSession<A> {
    api: A,
    active: Option<ActiveBattle>,
    // Plans accepted by the server since the last start or resolution.
    plans_submitted: usize,
}

impl<A> BattleSession<A>
where
    A: BattleApi,
{
    pub fn new(api: A) -> Self {
        Self {
            api,
            active: None,
            plans_submitted: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn battle_id(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.battle_id.as_str())
    }

    pub fn snapshot(&self) -> Option<&BattleSnapshot> {
        self.active.as_ref().map(|active| &active.snapshot)
    }

    pub fn plans_submitted(&self) -> usize {
        self.plans_submitted
    }

    /// Opens a new battle, replacing any battle held before.
    #[tracing::instrument(name = "start_battle", skip_all, fields(enemies = enemy_names.len()))]
    pub async fn start_battle(
        &mut self,
        enemy_names: &[String],
    ) -> Result<&BattleSnapshot, SessionError> {
        let started = self.api.start_battle(enemy_names).await?;
        tracing::info!(
            battle_id = %started.battle_id,
            party = started.snapshot.party.len(),
            enemies = started.snapshot.enemies.len(),
            "battle started."
        );

        self.plans_submitted = 0;
        let active = self.active.insert(ActiveBattle {
            battle_id: started.battle_id,
            snapshot: started.snapshot,
        });
        Ok(&active.snapshot)
    }

    /// Sends one actor's plan. Nothing is sent when the plan is out of order
    /// or points outside the current snapshot.
    #[tracing::instrument(
        name = "submit_plan",
        skip_all,
        fields(actor = plan.actor_index, kind = plan.kind.as_str(), target = plan.target_index)
    )]
    pub async fn submit_plan(&mut self, plan: &ActionPlan) -> Result<(), SessionError> {
        let active = self.active.as_ref().ok_or(SessionError::NoActiveBattle)?;
        validate_plan(&active.snapshot, self.plans_submitted, plan)?;

        self.api.submit_plan(&active.battle_id, plan).await?;
        self.plans_submitted += 1;
        tracing::debug!(submitted = self.plans_submitted, "plan accepted.");
        Ok(())
    }

    /// Resolves the round once every actor has a plan. On failure the previous
    /// snapshot and plan count are kept so the call can be retried.
    #[tracing::instrument(name = "resolve_round", skip_all)]
    pub async fn resolve_round(&mut self) -> Result<&BattleSnapshot, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveBattle)?;
        let required = active.snapshot.party.len();
        if self.plans_submitted != required {
            return Err(SessionError::IncompleteRound {
                submitted: self.plans_submitted,
                required,
            });
        }

        let snapshot = self.api.resolve_round(&active.battle_id).await?;
        tracing::info!(
            battle_id = %active.battle_id,
            new_logs = snapshot.logs.len(),
            "round resolved."
        );
        active.snapshot = snapshot;
        self.plans_submitted = 0;
        Ok(&active.snapshot)
    }
}

fn validate_plan(
    snapshot: &BattleSnapshot,
    expected_actor: usize,
    plan: &ActionPlan,
) -> Result<(), SessionError> {
    let party_len = snapshot.party.len();
    if plan.actor_index >= party_len {
        return Err(SessionError::ActorOutOfRange {
            actor_index: plan.actor_index,
            party_len,
        });
    }
    if plan.actor_index != expected_actor {
        return Err(SessionError::ActorOutOfOrder {
            expected: expected_actor,
            got: plan.actor_index,
        });
    }

    let side_len = snapshot.side(plan.target_side).len();
    let in_range = match plan.target_side {
        // Self-targeted plans always point back at the actor.
        TargetSide::Actor => plan.target_index == plan.actor_index,
        _ => plan.target_index < side_len,
    };
    if !in_range {
        return Err(SessionError::TargetOutOfRange {
            side: plan.target_side,
            target_index: plan.target_index,
            side_len,
        });
    }
    Ok(())
}
