// Plain-text rendering of battle state and flow screens. Pure functions:
// the same inputs always produce the same lines.

use crate::domain::{BattleOutcome, BattleSnapshot, Combatant};
use crate::use_cases::Screen;

const CURRENT_MARK: &str = "▶ ";
const NO_MARK: &str = "  ";

pub fn combatant_line(combatant: &Combatant) -> String {
    format!("{}  HP {}/{}", combatant.name, combatant.hp, combatant.max_hp)
}

/// Party (with the current actor marked), enemies and the battle log.
pub fn render_status(snapshot: &BattleSnapshot, current_actor: Option<usize>) -> Vec<String> {
    let mut lines = vec!["[Party]".to_string()];
    lines.extend(snapshot.party.iter().enumerate().map(|(index, member)| {
        let mark = if Some(index) == current_actor {
            CURRENT_MARK
        } else {
            NO_MARK
        };
        format!("{mark}{}", combatant_line(member))
    }));

    lines.push("[Enemies]".to_string());
    lines.extend(snapshot.enemies.iter().map(combatant_line));

    lines.push("[Log]".to_string());
    lines.extend(snapshot.logs.iter().cloned());
    lines
}

/// Prompt for the screen; options are numbered from 1.
pub fn render_screen(screen: &Screen) -> Vec<String> {
    match screen {
        Screen::Command {
            actor_name,
            options,
            ..
        } => {
            let mut lines = vec![format!("{actor_name}: choose a command")];
            lines.extend(
                options
                    .iter()
                    .enumerate()
                    .map(|(n, option)| format!("  {}) {}", n + 1, option.label)),
            );
            lines
        }
        Screen::Target {
            actor_name,
            command,
            targets,
            ..
        } => {
            let mut lines = vec![format!(
                "{actor_name}: choose a target for {} (b to go back)",
                command.kind.as_str()
            )];
            lines.extend(targets.iter().enumerate().map(|(n, target)| {
                format!("  {}) {}  HP {}/{}", n + 1, target.name, target.hp, target.max_hp)
            }));
            lines
        }
        Screen::RoundFailed { error } => vec![
            format!("Round could not be resolved: {error}"),
            "Enter r to retry.".to_string(),
        ],
        Screen::Finished { outcome } => vec![match outcome {
            BattleOutcome::Victory => "Victory!".to_string(),
            BattleOutcome::Defeat => "Your party was defeated.".to_string(),
            BattleOutcome::Ongoing => "The battle is over.".to_string(),
        }],
    }
}

/// Everything printed after an event, status first.
pub fn render_frame(snapshot: Option<&BattleSnapshot>, screen: &Screen) -> String {
    let mut lines = snapshot
        .map(|snapshot| render_status(snapshot, screen.actor()))
        .unwrap_or_default();
    lines.extend(render_screen(screen));
    let mut frame = lines.join("\n");
    frame.push('\n');
    frame
}
