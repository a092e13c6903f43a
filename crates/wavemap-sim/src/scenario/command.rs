//! Commands issued by an input controller
//!
//! Key and pointer bindings are translated elsewhere; the scene engine only
//! sees this closed set of commands.

use serde::{Deserialize, Serialize};

/// High-level scene command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Activate and select slot `key` (1..=9), or deactivate it if active
    SelectOrToggleEmitter(u8),
    /// Route subsequent moves to the receiver
    SelectReceiver,
    /// Move the selected emitter or the receiver (grid-relative)
    MoveSelected { x: f64, y: f64 },
    /// Add to the selected emitter's phase, in radians
    AdjustSelectedPhase(f64),
    ToggleAntennaPenalty,
    OptimizeConstructive,
    OptimizeDestructive,
    RandomizePhases,
}

/// Why a command had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Slot key outside 1..=9
    InvalidSlot(u8),
    /// Nothing selected to move
    NothingSelected,
    /// Phase adjustment needs a selected emitter
    NoEmitterSelected,
    /// Position or phase argument is NaN or infinite
    NonFinite,
}

impl std::fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IgnoreReason::InvalidSlot(key) => write!(f, "invalid emitter slot {}", key),
            IgnoreReason::NothingSelected => write!(f, "nothing selected"),
            IgnoreReason::NoEmitterSelected => write!(f, "no emitter selected"),
            IgnoreReason::NonFinite => write!(f, "non-finite argument"),
        }
    }
}

/// What happened to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied,
    Ignored(IgnoreReason),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_script_from_yaml() {
        let yaml = r#"
- select_or_toggle_emitter: 4
- move_selected: { x: 0.25, y: 0.75 }
- adjust_selected_phase: 1.25
- select_receiver
- toggle_antenna_penalty
- optimize_constructive
- optimize_destructive
- randomize_phases
"#;
        let script: Vec<Command> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            script,
            vec![
                Command::SelectOrToggleEmitter(4),
                Command::MoveSelected { x: 0.25, y: 0.75 },
                Command::AdjustSelectedPhase(1.25),
                Command::SelectReceiver,
                Command::ToggleAntennaPenalty,
                Command::OptimizeConstructive,
                Command::OptimizeDestructive,
                Command::RandomizePhases,
            ]
        );
    }

    #[test]
    fn test_outcome() {
        assert!(CommandOutcome::Applied.is_applied());
        let ignored = CommandOutcome::Ignored(IgnoreReason::InvalidSlot(0));
        assert!(!ignored.is_applied());
        assert_eq!(IgnoreReason::InvalidSlot(0).to_string(), "invalid emitter slot 0");
        assert_eq!(IgnoreReason::NonFinite.to_string(), "non-finite argument");
    }
}
