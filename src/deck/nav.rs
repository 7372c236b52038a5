use crate::foundation::error::{DeckError, DeckResult};

/// What a key press asks the deck to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Next,
    Prev,
}

/// Map a physical key code (`"Space"`, `"ArrowLeft"`, ...) to a navigation action.
pub fn action_for_key(code: &str) -> Option<NavAction> {
    match code {
        "Space" | "ArrowRight" | "Enter" => Some(NavAction::Next),
        "ArrowLeft" | "Backspace" => Some(NavAction::Prev),
        _ => None,
    }
}

/// Current beat index, clamped to `[0, len - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigator {
    len: usize,
    index: usize,
}

impl Navigator {
    pub fn new(len: usize) -> DeckResult<Self> {
        if len == 0 {
            return Err(DeckError::validation("navigator needs at least one beat"));
        }
        Ok(Self { len, index: 0 })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Jump to `index`, clamped. Returns whether the index changed.
    pub fn goto(&mut self, index: usize) -> bool {
        let next = index.min(self.len - 1);
        let changed = next != self.index;
        self.index = next;
        changed
    }

    pub fn next(&mut self) -> bool {
        self.goto(self.index.saturating_add(1))
    }

    pub fn prev(&mut self) -> bool {
        self.goto(self.index.saturating_sub(1))
    }

    pub fn apply(&mut self, action: NavAction) -> bool {
        match action {
            NavAction::Next => self.next(),
            NavAction::Prev => self.prev(),
        }
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Progress bar fill in `(0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.index + 1) as f64 / self.len as f64
    }
}
