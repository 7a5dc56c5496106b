// Battle flow: consumes discrete UI events and answers with the next screen to show.

use crate::domain::{
    ActionPlan, BattleApi, BattleOutcome, BattleSnapshot, CommandOption, PendingCommand,
};
use crate::use_cases::session::{BattleSession, SessionError};
use crate::use_cases::turn::{
    Choice, TargetOption, TurnController, TurnError, TurnState, living_targets,
};
use std::fmt;

/// Plain-data input produced by a front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// Index into the command menu.
    ChooseCommand(usize),
    /// Real index of the target in its side's sequence.
    ChooseTarget(usize),
    Cancel,
    Retry,
}

/// Render instruction returned after every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Command {
        actor: usize,
        actor_name: String,
        options: Vec<CommandOption>,
    },
    Target {
        actor: usize,
        actor_name: String,
        command: PendingCommand,
        targets: Vec<TargetOption>,
    },
    /// Resolution failed; the round can be retried.
    RoundFailed { error: String },
    Finished { outcome: BattleOutcome },
}

impl Screen {
    /// Party member to highlight, if input is being collected for one.
    pub fn actor(&self) -> Option<usize> {
        match self {
            Screen::Command { actor, .. } | Screen::Target { actor, .. } => Some(*actor),
            Screen::RoundFailed { .. } | Screen::Finished { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    NotStarted,
    NothingToRetry,
    Turn(TurnError),
    Session(SessionError),
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::NotStarted => write!(f, "battle has not started"),
            FlowError::NothingToRetry => write!(f, "nothing to retry"),
            FlowError::Turn(err) => write!(f, "{err}"),
            FlowError::Session(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FlowError {}

impl From<TurnError> for FlowError {
    fn from(err: TurnError) -> Self {
        FlowError::Turn(err)
    }
}

impl From<SessionError> for FlowError {
    fn from(err: SessionError) -> Self {
        FlowError::Session(err)
    }
}

/// Owns one battle session and its round input for the lifetime of a battle.
pub struct BattleFlow<A> {
    session: BattleSession<A>,
    turn: TurnController,
    resolve_error: Option<String>,
}

impl<A> BattleFlow<A>
where
    A: BattleApi,
{
    pub fn new(api: A, commands: Vec<CommandOption>) -> Self {
        Self {
            session: BattleSession::new(api),
            turn: TurnController::new(commands),
            resolve_error: None,
        }
    }

    pub fn session(&self) -> &BattleSession<A> {
        &self.session
    }

    pub fn turn(&self) -> &TurnController {
        &self.turn
    }

    pub fn snapshot(&self) -> Option<&BattleSnapshot> {
        self.session.snapshot()
    }

    pub async fn start(&mut self, enemy_names: &[String]) -> Result<Screen, FlowError> {
        let snapshot = self.session.start_battle(enemy_names).await?;
        self.turn.begin_round(snapshot);
        self.resolve_error = None;
        self.settle().await
    }

    /// Applies one event. Sequencing and submission errors leave the state as
    /// it was, so [`BattleFlow::screen`] still describes what to show.
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<Screen, FlowError> {
        let snapshot = self.session.snapshot().ok_or(FlowError::NotStarted)?;
        match event {
            UiEvent::ChooseCommand(index) => {
                if let Choice::Plan(plan) = self.turn.choose_command(index, snapshot)? {
                    self.submit(plan).await?;
                }
            }
            UiEvent::ChooseTarget(index) => {
                let plan = self.turn.choose_target(index, snapshot)?;
                self.submit(plan).await?;
            }
            UiEvent::Cancel => self.turn.cancel()?,
            UiEvent::Retry => {
                if *self.turn.state() != TurnState::RoundComplete {
                    return Err(FlowError::NothingToRetry);
                }
            }
        }
        self.settle().await
    }

    /// Screen for the current state, without touching the network.
    pub fn screen(&self) -> Result<Screen, FlowError> {
        let snapshot = self.session.snapshot().ok_or(FlowError::NotStarted)?;
        let actor_name = |actor: usize| {
            snapshot
                .party
                .get(actor)
                .map(|member| member.name.clone())
                .unwrap_or_default()
        };

        let screen = match self.turn.state() {
            TurnState::AwaitingCommand { actor } => Screen::Command {
                actor: *actor,
                actor_name: actor_name(*actor),
                options: self.turn.commands().to_vec(),
            },
            TurnState::AwaitingTarget { actor, command } => Screen::Target {
                actor: *actor,
                actor_name: actor_name(*actor),
                command: *command,
                targets: living_targets(snapshot, command.target_side),
            },
            TurnState::RoundComplete => Screen::RoundFailed {
                error: self.resolve_error.clone().unwrap_or_default(),
            },
            TurnState::Finished(outcome) => Screen::Finished { outcome: *outcome },
        };
        Ok(screen)
    }

    async fn submit(&mut self, plan: ActionPlan) -> Result<(), FlowError> {
        self.session.submit_plan(&plan).await?;
        self.turn.advance()?;
        Ok(())
    }

    // Resolves as soon as the round is complete. A failed resolution is shown
    // as a retryable screen rather than an error.
    async fn settle(&mut self) -> Result<Screen, FlowError> {
        if *self.turn.state() == TurnState::RoundComplete {
            match self.session.resolve_round().await {
                Ok(snapshot) => {
                    self.turn.begin_round(snapshot);
                    self.resolve_error = None;
                }
                Err(SessionError::Api(error)) => {
                    tracing::warn!(%error, "round resolution failed.");
                    self.resolve_error = Some(error.to_string());
                }
                Err(error) => return Err(error.into()),
            }
        }
        self.screen()
    }
}
