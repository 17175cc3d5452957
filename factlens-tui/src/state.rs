//! The view's state record and its transition functions.
//!
//! Four entities, exactly as the view owns them: the draft text (with its
//! cursor), the request phase, the error slot, and the result list. All
//! mutation goes through the methods here, which makes the double-submit
//! race explicit: every request is issued with a sequence number, and a
//! settlement is applied only if it belongs to the latest issued request.
//! Superseded settlements are discarded without touching the state.

use factlens_verify::Verdict;

/// Shown when the draft is blank after trimming. No request is issued.
pub const EMPTY_DRAFT_MSG: &str = "Please enter some text.";

/// Shown for any transport or decode failure. The underlying detail goes to
/// the log, never to the user.
pub const REQUEST_FAILED_MSG: &str = "Oops! Something went wrong. Please try again.";

/// Request lifecycle phase. `Busy` carries the sequence number of the
/// outstanding request so settlements can be matched against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Busy { seq: u64 },
}

pub struct ViewState {
    draft: String,
    cursor: usize,
    phase: Phase,
    results: Vec<Verdict>,
    error: Option<String>,
    next_seq: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            draft: String::new(),
            cursor: 0,
            phase: Phase::Idle,
            results: Vec::new(),
            error: None,
            next_seq: 0,
        }
    }

    // ----- accessors -----

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn results(&self) -> &[Verdict] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Busy { .. })
    }

    // ----- submission lifecycle -----

    /// Attempt a submission. Returns the sequence number of the issued
    /// request, or `None` if the draft was blank (the validation message is
    /// set and nothing else changes).
    pub fn submit(&mut self) -> Option<u64> {
        if self.draft.trim().is_empty() {
            self.error = Some(EMPTY_DRAFT_MSG.into());
            return None;
        }

        self.error = None;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.phase = Phase::Busy { seq };
        Some(seq)
    }

    /// Settle a request. Returns `true` if the settlement was applied,
    /// `false` if it belonged to a superseded request and was discarded.
    ///
    /// On success the results are replaced wholesale; on failure the stale
    /// results are retained and only the error slot changes.
    pub fn settle(&mut self, seq: u64, outcome: Result<Vec<Verdict>, String>) -> bool {
        let latest = self.next_seq.checked_sub(1);
        if latest != Some(seq) {
            return false;
        }

        self.phase = Phase::Idle;
        match outcome {
            Ok(verdicts) => {
                self.results = verdicts;
                self.error = None;
            }
            Err(_detail) => {
                self.error = Some(REQUEST_FAILED_MSG.into());
            }
        }
        true
    }

    /// Drop the result list and any error. The draft is untouched.
    pub fn clear_results(&mut self) {
        self.results.clear();
        self.error = None;
    }

    // ----- draft editing -----

    pub fn insert_char(&mut self, ch: char) {
        self.draft.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut prev = self.cursor.saturating_sub(1);
        while prev > 0 && !self.draft.is_char_boundary(prev) {
            prev -= 1;
        }
        self.draft.drain(prev..self.cursor);
        self.cursor = prev;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.draft.len() {
            return;
        }
        let start = self.cursor;
        let mut end = start + 1;
        while end < self.draft.len() && !self.draft.is_char_boundary(end) {
            end += 1;
        }
        self.draft.drain(start..end);
    }

    pub fn cursor_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        while self.cursor > 0 && !self.draft.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    pub fn cursor_right(&mut self) {
        if self.cursor >= self.draft.len() {
            return;
        }
        self.cursor += 1;
        while self.cursor < self.draft.len() && !self.draft.is_char_boundary(self.cursor) {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.draft.len();
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(claim: &str) -> Verdict {
        Verdict {
            claim: claim.into(),
            label: "supported".into(),
            score: 0.9,
            source: "S".into(),
            evidence: "E".into(),
        }
    }

    fn type_str(state: &mut ViewState, s: &str) {
        for ch in s.chars() {
            state.insert_char(ch);
        }
    }

    #[test]
    fn blank_submit_sets_error_and_issues_nothing() {
        let mut state = ViewState::new();
        assert_eq!(state.submit(), None);
        assert_eq!(state.error(), Some(EMPTY_DRAFT_MSG));
        assert!(!state.is_busy());

        // Whitespace-only counts as blank too.
        type_str(&mut state, "  \n\t ");
        assert_eq!(state.submit(), None);
        assert!(!state.is_busy());
    }

    #[test]
    fn submit_clears_prior_error_before_the_request() {
        let mut state = ViewState::new();
        state.submit();
        assert!(state.error().is_some());

        type_str(&mut state, "the moon is cheese");
        let seq = state.submit().expect("non-blank draft issues");
        assert_eq!(state.error(), None);
        assert!(state.is_busy());
        state.settle(seq, Ok(vec![]));
    }

    #[test]
    fn busy_spans_issuance_to_settlement_on_both_paths() {
        let mut state = ViewState::new();
        type_str(&mut state, "claim");

        let seq = state.submit().unwrap();
        assert!(state.is_busy());
        assert!(state.settle(seq, Ok(vec![verdict("a")])));
        assert!(!state.is_busy());

        let seq = state.submit().unwrap();
        assert!(state.is_busy());
        assert!(state.settle(seq, Err("connection refused".into())));
        assert!(!state.is_busy());
    }

    #[test]
    fn success_replaces_results_wholesale() {
        let mut state = ViewState::new();
        type_str(&mut state, "claim");

        let seq = state.submit().unwrap();
        state.settle(seq, Ok(vec![verdict("a"), verdict("b")]));
        assert_eq!(state.results().len(), 2);

        let seq = state.submit().unwrap();
        state.settle(seq, Ok(vec![verdict("c")]));
        let claims: Vec<&str> = state.results().iter().map(|v| v.claim.as_str()).collect();
        assert_eq!(claims, ["c"]);
    }

    #[test]
    fn failure_retains_stale_results_and_sets_error() {
        let mut state = ViewState::new();
        type_str(&mut state, "claim");

        let seq = state.submit().unwrap();
        state.settle(seq, Ok(vec![verdict("a"), verdict("b")]));

        let seq = state.submit().unwrap();
        assert!(state.settle(seq, Err("timeout".into())));
        assert_eq!(state.results().len(), 2, "stale results survive a failure");
        assert_eq!(state.error(), Some(REQUEST_FAILED_MSG));
    }

    #[test]
    fn superseded_settlement_is_discarded() {
        let mut state = ViewState::new();
        type_str(&mut state, "claim");

        let first = state.submit().unwrap();
        let second = state.submit().unwrap();
        assert_ne!(first, second);

        // The first request settles after being superseded: discarded, still busy.
        assert!(!state.settle(first, Ok(vec![verdict("old")])));
        assert!(state.is_busy());
        assert!(state.results().is_empty());

        // The latest request's settlement applies.
        assert!(state.settle(second, Ok(vec![verdict("new")])));
        assert!(!state.is_busy());
        assert_eq!(state.results()[0].claim, "new");

        // A straggler from the first request after everything settled is
        // still discarded.
        assert!(!state.settle(first, Err("late failure".into())));
        assert_eq!(state.results()[0].claim, "new");
        assert_eq!(state.error(), None);
    }

    #[test]
    fn draft_survives_submissions_verbatim() {
        let mut state = ViewState::new();
        type_str(&mut state, "  spaced  claim \n second line ");
        let before = state.draft().to_string();

        let seq = state.submit().unwrap();
        state.settle(seq, Ok(vec![]));

        assert_eq!(state.draft(), before, "draft is not cleared or trimmed");
    }

    #[test]
    fn draft_edits_echo_verbatim_including_whitespace() {
        let mut state = ViewState::new();
        type_str(&mut state, "a  b");
        assert_eq!(state.draft(), "a  b");

        state.cursor_home();
        state.insert_char(' ');
        assert_eq!(state.draft(), " a  b");

        state.cursor_end();
        state.backspace();
        assert_eq!(state.draft(), " a  ");
    }

    #[test]
    fn editing_respects_multibyte_boundaries() {
        let mut state = ViewState::new();
        type_str(&mut state, "héllo");
        state.cursor_home();
        state.cursor_right();
        state.cursor_right();
        state.backspace();
        assert_eq!(state.draft(), "hllo");

        state.delete();
        assert_eq!(state.draft(), "hlo");
    }

    #[test]
    fn clear_results_drops_results_and_error_but_not_draft() {
        let mut state = ViewState::new();
        type_str(&mut state, "claim");
        let seq = state.submit().unwrap();
        state.settle(seq, Ok(vec![verdict("a")]));

        let seq = state.submit().unwrap();
        state.settle(seq, Err("boom".into()));

        state.clear_results();
        assert!(state.results().is_empty());
        assert_eq!(state.error(), None);
        assert_eq!(state.draft(), "claim");
    }
}
