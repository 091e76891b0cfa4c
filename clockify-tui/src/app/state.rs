use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Timer,
    Entries,
    Reports,
}

impl View {
    pub const ALL: [View; 3] = [View::Timer, View::Entries, View::Reports];

    pub fn title(self) -> &'static str {
        match self {
            View::Timer => "Timer",
            View::Entries => "Entries",
            View::Reports => "Reports",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntriesScope {
    Today,
    ThisWeek,
}

impl EntriesScope {
    pub fn toggled(self) -> Self {
        match self {
            EntriesScope::Today => EntriesScope::ThisWeek,
            EntriesScope::ThisWeek => EntriesScope::Today,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EntriesScope::Today => "Today",
            EntriesScope::ThisWeek => "This Week",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    pub fn toggled(self) -> Self {
        match self {
            ReportKind::Daily => ReportKind::Weekly,
            ReportKind::Weekly => ReportKind::Daily,
        }
    }
}

/// Identifies which report a batch of fetched entries belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportKey {
    pub kind: ReportKind,
    /// The day for daily reports, the Monday for weekly ones.
    pub start: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

/// A text input with mid-string cursor support and a character cap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = Some(max_chars);
        self
    }

    /// Replace the value, truncated to the cap, with the cursor at the end.
    pub fn set_value(&mut self, s: &str) {
        self.value = match self.max_chars {
            Some(max) => s.chars().take(max).collect(),
            None => s.to_string(),
        };
        self.cursor = self.value.len();
    }

    /// Insert a character at the cursor position. Ignored once the cap is hit.
    pub fn insert(&mut self, c: char) -> bool {
        if self
            .max_chars
            .is_some_and(|max| self.value.chars().count() >= max)
        {
            return false;
        }
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        true
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos - 1;
        while !self.value.is_char_boundary(p) {
            p -= 1;
        }
        p
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p < self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}
