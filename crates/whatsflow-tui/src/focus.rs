//! Pane focus.
//!
//! The playground has exactly three panes and no overlays; focus is a plain
//! cycle through them.

/// The three panes of the playground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Chat transcript and input, on the left.
    #[default]
    Chat,
    /// Flow graph canvas, in the center.
    Graph,
    /// Interactive screen preview, on the right.
    Preview,
}

impl Focus {
    /// The pane Tab moves to.
    pub fn next(self) -> Self {
        match self {
            Focus::Chat => Focus::Graph,
            Focus::Graph => Focus::Preview,
            Focus::Preview => Focus::Chat,
        }
    }

    /// The pane Shift+Tab moves to.
    pub fn prev(self) -> Self {
        match self {
            Focus::Chat => Focus::Preview,
            Focus::Graph => Focus::Chat,
            Focus::Preview => Focus::Graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_focus_is_chat() {
        assert_eq!(Focus::default(), Focus::Chat);
    }

    #[test]
    fn test_cycle_next_visits_every_pane() {
        let mut focus = Focus::Chat;
        focus = focus.next();
        assert_eq!(focus, Focus::Graph);
        focus = focus.next();
        assert_eq!(focus, Focus::Preview);
        focus = focus.next();
        assert_eq!(focus, Focus::Chat);
    }

    #[test]
    fn test_prev_inverts_next() {
        for focus in [Focus::Chat, Focus::Graph, Focus::Preview] {
            assert_eq!(focus.next().prev(), focus);
            assert_eq!(focus.prev().next(), focus);
        }
    }
}
