use std::collections::VecDeque;

const LOG_CAPACITY: usize = 50;

pub const DEFAULT_PLAYER: &str = "Jayson Tatum";
pub const DEFAULT_SEASON: &str = "2023-24";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Name,
    Season,
}

/// The single last-result slot. Overwritten whole on every query.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub player: String,
    pub season: String,
    pub text: String,
    pub failed: bool,
}

pub struct AppState {
    pub name_input: String,
    pub season_input: String,
    pub focus: InputFocus,
    pub last_report: Option<RenderedReport>,
    pub report_scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            name_input: DEFAULT_PLAYER.to_string(),
            season_input: DEFAULT_SEASON.to_string(),
            focus: InputFocus::Name,
            last_report: None,
            report_scroll: 0,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.logs.push_back(line.into());
        while self.logs.len() > LOG_CAPACITY {
            self.logs.pop_front();
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            InputFocus::Name => InputFocus::Season,
            InputFocus::Season => InputFocus::Name,
        };
    }

    pub fn focused_input_mut(&mut self) -> &mut String {
        match self.focus {
            InputFocus::Name => &mut self.name_input,
            InputFocus::Season => &mut self.season_input,
        }
    }

    pub fn store_report(&mut self, report: RenderedReport) {
        self.last_report = Some(report);
        self.report_scroll = 0;
    }

    pub fn scroll_up(&mut self) {
        self.report_scroll = self.report_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.report_scroll = self.report_scroll.saturating_add(1);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(text: &str) -> RenderedReport {
        RenderedReport {
            player: "P".to_string(),
            season: "2023-24".to_string(),
            text: text.to_string(),
            failed: false,
        }
    }

    #[test]
    fn new_report_overwrites_slot_and_resets_scroll() {
        let mut state = AppState::new();
        state.store_report(rendered("first"));
        state.scroll_down();
        state.scroll_down();
        assert_eq!(state.report_scroll, 2);

        state.store_report(rendered("second"));
        assert_eq!(state.report_scroll, 0);
        assert_eq!(state.last_report.as_ref().map(|r| r.text.as_str()), Some("second"));
    }

    #[test]
    fn log_ring_is_bounded() {
        let mut state = AppState::new();
        for i in 0..200 {
            state.push_log(format!("line {i}"));
        }
        assert_eq!(state.logs.len(), LOG_CAPACITY);
        assert_eq!(state.logs.front().map(String::as_str), Some("line 150"));
    }

    #[test]
    fn focus_cycles_between_both_fields() {
        let mut state = AppState::new();
        assert_eq!(state.focus, InputFocus::Name);
        state.cycle_focus();
        assert_eq!(state.focus, InputFocus::Season);
        state.cycle_focus();
        assert_eq!(state.focus, InputFocus::Name);
    }
}
