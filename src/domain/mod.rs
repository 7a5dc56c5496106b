// Domain layer: battle state, planned actions and the battle server port.

pub mod action;
pub mod errors;
pub mod ports;
pub mod snapshot;

pub use action::{ActionKind, ActionPlan, CommandOption, PendingCommand, TargetSide};
pub use errors::ApiError;
pub use ports::{BattleApi, StartedBattle};
pub use snapshot::{BattleOutcome, BattleSnapshot, Combatant};
