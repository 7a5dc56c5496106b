// Terminal input parsing: one line of text becomes at most one UI event.

use crate::use_cases::{Screen, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine {
    /// 1-based menu number as displayed.
    Select(usize),
    Back,
    Retry,
    Quit,
}

pub fn parse_line(line: &str) -> Option<InputLine> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "b" | "back" => Some(InputLine::Back),
        "r" | "retry" => Some(InputLine::Retry),
        "q" | "quit" => Some(InputLine::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(InputLine::Select),
    }
}

/// Maps a displayed menu number to the event for the current screen. Target
/// numbers map to the target's real index, which skips defeated combatants.
pub fn select_event(screen: &Screen, number: usize) -> Option<UiEvent> {
    let position = number.checked_sub(1)?;
    match screen {
        Screen::Command { options, .. } => {
            (position < options.len()).then_some(UiEvent::ChooseCommand(position))
        }
        Screen::Target { targets, .. } => targets
            .get(position)
            .map(|target| UiEvent::ChooseTarget(target.index)),
        Screen::RoundFailed { .. } | Screen::Finished { .. } => None,
    }
}
