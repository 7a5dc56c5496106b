use serde::{Deserialize, Serialize};

/// Command categories understood by the battle server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fight,
    Magic,
    Item,
    Defend,
    Jump,
    Run,
    Special,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Fight => "fight",
            ActionKind::Magic => "magic",
            ActionKind::Item => "item",
            ActionKind::Defend => "defend",
            ActionKind::Jump => "jump",
            ActionKind::Run => "run",
            ActionKind::Special => "special",
        }
    }
}

/// Which combatant sequence a plan's `target_index` points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSide {
    #[default]
    Enemy,
    Ally,
    // The acting party member itself.
    #[serde(rename = "self")]
    Actor,
}

/// One actor's declared action for the current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPlan {
    pub actor_index: usize,
    pub kind: ActionKind,
    pub target_side: TargetSide,
    pub target_index: usize,
    pub target_all: bool,
}

/// Command chosen for the current actor, waiting for its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCommand {
    pub kind: ActionKind,
    pub target_side: TargetSide,
    pub target_all: bool,
}

impl PendingCommand {
    /// Self-targeted and whole-side commands skip target selection.
    pub fn needs_target(&self) -> bool {
        !self.target_all && self.target_side != TargetSide::Actor
    }

    pub fn plan(&self, actor_index: usize, target_index: usize) -> ActionPlan {
        ActionPlan {
            actor_index,
            kind: self.kind,
            target_side: self.target_side,
            target_index,
            target_all: self.target_all,
        }
    }
}

/// Entry of the command menu shown for every actor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandOption {
    pub label: String,
    pub kind: ActionKind,
    #[serde(default)]
    pub target_side: TargetSide,
    #[serde(default)]
    pub target_all: bool,
}

impl CommandOption {
    /// Single-target attack on an enemy, the default menu entry.
    pub fn fight() -> Self {
        Self {
            label: "Fight".to_string(),
            kind: ActionKind::Fight,
            target_side: TargetSide::Enemy,
            target_all: false,
        }
    }

    pub fn pending(&self) -> PendingCommand {
        PendingCommand {
            kind: self.kind,
            target_side: self.target_side,
            target_all: self.target_all,
        }
    }
}
