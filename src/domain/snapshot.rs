use serde::{Deserialize, Serialize};

use crate::domain::action::TargetSide;

// Snapshot types double as wire DTOs. Keeping serde here is a leak into the
// domain, but the server shape and the domain shape are the same.

/// A single party member or enemy as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
}

impl Combatant {
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}

/// How the battle stands according to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
}

/// Authoritative battle state. Replaced wholesale by every server response
/// and never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub party: Vec<Combatant>,
    pub enemies: Vec<Combatant>,
    pub logs: Vec<String>,
}

impl BattleSnapshot {
    /// Combatants a plan aimed at `side` indexes into. `Actor` resolves to the
    /// party, since the acting member is one of them.
    pub fn side(&self, side: TargetSide) -> &[Combatant] {
        match side {
            TargetSide::Enemy => &self.enemies,
            TargetSide::Ally | TargetSide::Actor => &self.party,
        }
    }

    /// A wiped party loses even if the enemies are down too. An empty party
    /// counts as wiped; an empty enemy line-up does not count as a win.
    pub fn outcome(&self) -> BattleOutcome {
        if self.party.iter().all(Combatant::is_defeated) {
            return BattleOutcome::Defeat;
        }
        if !self.enemies.is_empty() && self.enemies.iter().all(Combatant::is_defeated) {
            return BattleOutcome::Victory;
        }
        BattleOutcome::Ongoing
    }

    /// Checks `0 < max_hp` and `hp <= max_hp` for every combatant.
    pub fn validate(&self) -> Result<(), String> {
        let all = self
            .party
            .iter()
            .map(|c| ("party", c))
            .chain(self.enemies.iter().map(|c| ("enemies", c)));
        for (side, combatant) in all {
            if combatant.max_hp == 0 {
                return Err(format!("{side} member {} has max_hp 0", combatant.name));
            }
            if combatant.hp > combatant.max_hp {
                return Err(format!(
                    "{side} member {} has hp {} above max_hp {}",
                    combatant.name, combatant.hp, combatant.max_hp
                ));
            }
        }
        Ok(())
    }
}
