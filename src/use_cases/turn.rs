// Round input state machine: one command and one target per party actor.

use crate::domain::{
    ActionPlan, BattleOutcome, BattleSnapshot, CommandOption, PendingCommand, TargetSide,
};
use std::fmt;

/// Where the current round's input collection stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    AwaitingCommand {
        actor: usize,
    },
    AwaitingTarget {
        actor: usize,
        command: PendingCommand,
    },
    /// Every actor has a plan accepted; the round must be resolved.
    RoundComplete,
    /// The battle is decided; no further input is collected.
    Finished(BattleOutcome),
}

/// Result of choosing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// A target must be picked next.
    Target,
    /// The command needs no target and its plan is ready to submit.
    Plan(ActionPlan),
}

/// A selectable target, carrying its real index in the side's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOption {
    pub index: usize,
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnError {
    NotAwaitingCommand,
    NotAwaitingTarget,
    UnknownCommand(usize),
    /// The chosen command has nothing alive to aim at.
    NoTargets,
    /// Target is missing or already defeated.
    InvalidTarget(usize),
}

impl fmt::Display for TurnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnError::NotAwaitingCommand => write!(f, "no command is expected right now"),
            TurnError::NotAwaitingTarget => write!(f, "no target is expected right now"),
            TurnError::UnknownCommand(index) => write!(f, "command {index} is not on the menu"),
            TurnError::NoTargets => write!(f, "there is nothing to target"),
            TurnError::InvalidTarget(index) => write!(f, "target {index} cannot be chosen"),
        }
    }
}

impl std::error::Error for TurnError {}

/// Living combatants on `side`, in snapshot order.
pub fn living_targets(snapshot: &BattleSnapshot, side: TargetSide) -> Vec<TargetOption> {
    snapshot
        .side(side)
        .iter()
        .enumerate()
        .filter(|(_, combatant)| !combatant.is_defeated())
        .map(|(index, combatant)| TargetOption {
            index,
            name: combatant.name.clone(),
            hp: combatant.hp,
            max_hp: combatant.max_hp,
        })
        .collect()
}

/// Walks the party once per round. Choices only produce plans; the caller
/// advances the cursor with [`TurnController::advance`] once the server has
/// accepted the plan, so a failed submission leaves the same actor in place.
#[derive(Debug, Clone)]
pub struct TurnController {
    commands: Vec<CommandOption>,
    state: TurnState,
    party_len: usize,
}

impl TurnController {
    pub fn new(commands: Vec<CommandOption>) -> Self {
        Self {
            commands,
            state: TurnState::AwaitingCommand { actor: 0 },
            party_len: 0,
        }
    }

    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn commands(&self) -> &[CommandOption] {
        &self.commands
    }

    /// Actor awaiting input, or the party length once the round is complete.
    pub fn cursor(&self) -> usize {
        match self.state {
            TurnState::AwaitingCommand { actor } | TurnState::AwaitingTarget { actor, .. } => actor,
            TurnState::RoundComplete | TurnState::Finished(_) => self.party_len,
        }
    }

    /// Restarts input collection against a fresh snapshot.
    pub fn begin_round(&mut self, snapshot: &BattleSnapshot) {
        self.party_len = snapshot.party.len();
        self.state = match snapshot.outcome() {
            BattleOutcome::Ongoing => TurnState::AwaitingCommand { actor: 0 },
            outcome => TurnState::Finished(outcome),
        };
        tracing::debug!(party = self.party_len, state = ?self.state, "round started.");
    }

    pub fn choose_command(
        &mut self,
        option_index: usize,
        snapshot: &BattleSnapshot,
    ) -> Result<Choice, TurnError> {
        let TurnState::AwaitingCommand { actor } = self.state else {
            return Err(TurnError::NotAwaitingCommand);
        };
        let command = self
            .commands
            .get(option_index)
            .ok_or(TurnError::UnknownCommand(option_index))?
            .pending();

        if command.target_side == TargetSide::Actor {
            return Ok(Choice::Plan(command.plan(actor, actor)));
        }
        if living_targets(snapshot, command.target_side).is_empty() {
            return Err(TurnError::NoTargets);
        }
        if command.target_all {
            return Ok(Choice::Plan(command.plan(actor, 0)));
        }

        self.state = TurnState::AwaitingTarget { actor, command };
        Ok(Choice::Target)
    }

    pub fn choose_target(
        &self,
        target_index: usize,
        snapshot: &BattleSnapshot,
    ) -> Result<ActionPlan, TurnError> {
        let TurnState::AwaitingTarget { actor, command } = self.state else {
            return Err(TurnError::NotAwaitingTarget);
        };
        let alive = snapshot
            .side(command.target_side)
            .get(target_index)
            .is_some_and(|combatant| !combatant.is_defeated());
        if !alive {
            return Err(TurnError::InvalidTarget(target_index));
        }
        Ok(command.plan(actor, target_index))
    }

    /// Moves past the current actor. Completing the last actor is the only
    /// way into `RoundComplete`.
    pub fn advance(&mut self) -> Result<(), TurnError> {
        let actor = match self.state {
            TurnState::AwaitingCommand { actor } | TurnState::AwaitingTarget { actor, .. } => actor,
            _ => return Err(TurnError::NotAwaitingCommand),
        };
        let next = actor + 1;
        self.state = if next < self.party_len {
            TurnState::AwaitingCommand { actor: next }
        } else {
            TurnState::RoundComplete
        };
        Ok(())
    }

    /// Drops the pending command and returns to the same actor's menu.
    pub fn cancel(&mut self) -> Result<(), TurnError> {
        let TurnState::AwaitingTarget { actor, .. } = self.state else {
            return Err(TurnError::NotAwaitingTarget);
        };
        self.state = TurnState::AwaitingCommand { actor };
        Ok(())
    }
}
