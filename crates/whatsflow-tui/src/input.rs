//! Chat input editing.
//!
//! A single-line editor built as two stacks meeting at the cursor: `head`
//! holds the text before it, `tail` the text after it in reverse order.
//! Every edit and cursor move is a push or pop at a string end, and
//! multi-byte characters never need boundary math.

/// Sent messages kept for Up/Down recall.
const MAX_HISTORY: usize = 100;

/// The chat box: the line being typed plus recall over what was sent.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Text before the cursor.
    head: String,
    /// Text after the cursor, last character first.
    tail: String,
    /// Sent messages, oldest first.
    history: Vec<String>,
    /// Set while Up/Down walk the history.
    browse: Option<Browse>,
}

/// Where a history walk stands and what it displaced.
#[derive(Debug, Clone)]
struct Browse {
    index: usize,
    draft: String,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The line as typed.
    pub fn content(&self) -> String {
        let mut text = self.head.clone();
        text.extend(self.tail.chars().rev());
        text
    }

    /// Character column of the cursor, for terminal placement.
    pub fn cursor_column(&self) -> usize {
        self.head.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        self.head.push(c);
        self.browse = None;
    }

    /// Backspace.
    pub fn delete_char_before(&mut self) {
        if self.head.pop().is_some() {
            self.browse = None;
        }
    }

    /// The delete key.
    pub fn delete_char_at(&mut self) {
        if self.tail.pop().is_some() {
            self.browse = None;
        }
    }

    pub fn move_left(&mut self) {
        if let Some(c) = self.head.pop() {
            self.tail.push(c);
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.tail.pop() {
            self.head.push(c);
        }
    }

    pub fn move_to_start(&mut self) {
        while let Some(c) = self.head.pop() {
            self.tail.push(c);
        }
    }

    pub fn move_to_end(&mut self) {
        while let Some(c) = self.tail.pop() {
            self.head.push(c);
        }
    }

    /// Drop the line without recording it.
    pub fn clear(&mut self) {
        self.head.clear();
        self.tail.clear();
        self.browse = None;
    }

    /// Take the line for sending and remember it for recall. Consecutive
    /// repeats collapse to one entry, like shell history.
    pub fn submit(&mut self) -> String {
        let message = self.content();
        self.clear();
        if !message.is_empty() && self.history.last() != Some(&message) {
            if self.history.len() == MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(message.clone());
        }
        message
    }

    /// Recall the message sent before the one shown, saving the unsent line
    /// on the first step back. Pinned at the oldest entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let (index, draft) = match self.browse.take() {
            None => (self.history.len() - 1, self.content()),
            Some(walk) => (walk.index.saturating_sub(1), walk.draft),
        };
        self.show(self.history[index].clone());
        self.browse = Some(Browse { index, draft });
    }

    /// Step toward the unsent line, restoring it past the newest entry.
    pub fn history_next(&mut self) {
        let Some(walk) = self.browse.take() else {
            return;
        };
        let index = walk.index + 1;
        if index < self.history.len() {
            self.show(self.history[index].clone());
            self.browse = Some(Browse {
                index,
                draft: walk.draft,
            });
        } else {
            self.show(walk.draft);
        }
    }

    /// Replace the line, cursor at the end.
    fn show(&mut self, text: String) {
        self.head = text;
        self.tail.clear();
    }
}
