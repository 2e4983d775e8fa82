/// Per-entry visibility state with hysteresis.
///
/// A flip commits only after `required` consecutive evaluations agree on
/// the opposite visibility; any disagreeing evaluation resets the streak.
/// Pending states keep the committed visibility.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullState {
    #[default]
    Visible,
    PendingHidden(u32),
    Hidden,
    PendingVisible(u32),
}

impl CullState {
    /// Committed visibility
    pub fn is_visible(&self) -> bool {
        matches!(self, CullState::Visible | CullState::PendingHidden(_))
    }

    /// Next state after one evaluation
    pub fn step(self, wants_visible: bool, required: u32) -> CullState {
        let required = required.max(1);
        match (self, wants_visible) {
            (CullState::Visible, true) | (CullState::PendingHidden(_), true) => CullState::Visible,
            (CullState::Hidden, false) | (CullState::PendingVisible(_), false) => CullState::Hidden,
            (CullState::Visible, false) => Self::pending_hidden(1, required),
            (CullState::PendingHidden(streak), false) => Self::pending_hidden(streak + 1, required),
            (CullState::Hidden, true) => Self::pending_visible(1, required),
            (CullState::PendingVisible(streak), true) => Self::pending_visible(streak + 1, required),
        }
    }

    fn pending_hidden(streak: u32, required: u32) -> CullState {
        if streak >= required { CullState::Hidden } else { CullState::PendingHidden(streak) }
    }

    fn pending_visible(streak: u32, required: u32) -> CullState {
        if streak >= required { CullState::Visible } else { CullState::PendingVisible(streak) }
    }
}

#[cfg(test)]
#[path = "hysteresis_tests.rs"]
mod tests;
