//! Intake state machine — tracks which question the session is on.

use serde::{Deserialize, Serialize};

/// The steps of the intake conversation.
///
/// Progresses linearly: AwaitingName → AwaitingEmail → AwaitingBusinessType →
/// AwaitingNeeds → Complete. `Complete` is terminal and loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeStep {
    AwaitingName,
    AwaitingEmail,
    AwaitingBusinessType,
    AwaitingNeeds,
    Complete,
}

impl IntakeStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: IntakeStep) -> bool {
        use IntakeStep::*;
        matches!(
            (self, target),
            (AwaitingName, AwaitingEmail)
                | (AwaitingEmail, AwaitingBusinessType)
                | (AwaitingBusinessType, AwaitingNeeds)
                | (AwaitingNeeds, Complete)
        )
    }

    /// Whether this step is terminal (the intake is done).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Get the next step in the linear progression, if any.
    pub fn next(&self) -> Option<IntakeStep> {
        use IntakeStep::*;
        match self {
            AwaitingName => Some(AwaitingEmail),
            AwaitingEmail => Some(AwaitingBusinessType),
            AwaitingBusinessType => Some(AwaitingNeeds),
            AwaitingNeeds => Some(Complete),
            Complete => None,
        }
    }

    /// Zero-based position in the progression (Complete is 4).
    pub fn index(&self) -> u8 {
        use IntakeStep::*;
        match self {
            AwaitingName => 0,
            AwaitingEmail => 1,
            AwaitingBusinessType => 2,
            AwaitingNeeds => 3,
            Complete => 4,
        }
    }
}

impl Default for IntakeStep {
    fn default() -> Self {
        Self::AwaitingName
    }
}

impl std::fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingName => "awaiting_name",
            Self::AwaitingEmail => "awaiting_email",
            Self::AwaitingBusinessType => "awaiting_business_type",
            Self::AwaitingNeeds => "awaiting_needs",
            Self::Complete => "complete",
        };
        write!(f, "{s}")
    }
}

/// Per-session state: the current step plus the fields collected so far.
///
/// Created with `step = AwaitingName` and all fields empty on connection
/// establishment; destroyed with the connection. Each field is written
/// exactly once, by the state machine, when its step commits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub step: IntakeStep,
    pub name: String,
    pub email: String,
    pub business_type: String,
    pub needs: String,
}

impl SessionState {
    /// Advance to the next step. At `Complete` this is a no-op, so the step
    /// is monotonically non-decreasing by construction.
    pub fn advance(&mut self) -> IntakeStep {
        if let Some(next) = self.step.next() {
            if self.step.can_transition_to(next) {
                self.step = next;
            }
        }
        self.step
    }
}
