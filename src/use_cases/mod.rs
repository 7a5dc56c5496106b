// Use cases layer: the battle session, round input and the flow tying them together.

pub mod flow;
pub mod session;
pub mod turn;


pub use flow::{BattleFlow, FlowError, Screen, UiEvent};
pub use session::{BattleSession, SessionError};
pub use turn::{Choice, TargetOption, TurnController, TurnError, TurnState};
