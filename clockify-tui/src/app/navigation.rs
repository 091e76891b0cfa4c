use super::*;
use time::Duration;

impl App {
    pub fn navigate_to(&mut self, view: View) {
        self.current_view = view;
        self.clear_status();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Move selection up in the entries list
    pub fn select_previous_entry(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.selected_entry = Some(self.selected_entry.map_or(0, |i| i.saturating_sub(1)));
    }

    /// Move selection down in the entries list
    pub fn select_next_entry(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        self.selected_entry = Some(self.selected_entry.map_or(0, |i| (i + 1).min(last)));
    }

    pub fn toggle_entries_scope(&mut self) {
        self.entries_scope = self.entries_scope.toggled();
        self.entries.clear();
        self.selected_entry = None;
    }

    pub fn toggle_report_kind(&mut self) {
        self.report_kind = self.report_kind.toggled();
    }

    /// One day back, or one week for weekly reports.
    pub fn report_previous(&mut self) {
        if let Some(date) = self.report_date.checked_sub(self.report_step()) {
            self.report_date = date;
        }
    }

    pub fn report_next(&mut self) {
        if let Some(date) = self.report_date.checked_add(self.report_step()) {
            self.report_date = date;
        }
    }

    fn report_step(&self) -> Duration {
        match self.report_kind {
            ReportKind::Daily => Duration::days(1),
            ReportKind::Weekly => Duration::weeks(1),
        }
    }
}
