use crate::{
    cards::render_cards,
    command::{Command, parse_command},
    state::ViewState,
    view::{self, ViewSnap},
};
use anyhow::Result;
use crossterm::{
    event::{Event as CtEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use factlens_common::ShutdownHandle;
use factlens_verify::{Verdict, VerifyApi};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum UiMsg {
    InputEvent(CtEvent),
    Tick,
    Submit,
    VerifyDone {
        seq: u64,
        outcome: Result<Vec<Verdict>, String>,
    },
    ScrollUp,
    ScrollDown,
    Shutdown,
}

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct ClaimView<B: Backend> {
    state: ViewState,

    // deps
    api: VerifyApi,

    // terminal
    term: Terminal<B>,
    tick_rate: Duration,
    last_tick: Instant,
    restore_terminal: bool,

    // ui chrome
    scroll: usize,
    dirty: bool,
    spin_idx: usize,
    notice: Option<String>,

    // shutdown coordination
    shutdown: ShutdownHandle,
}

impl ClaimView<CrosstermBackend<Stdout>> {
    pub fn new(
        api: VerifyApi,
        tick_rate: Duration,
        shutdown: ShutdownHandle,
    ) -> factlens_common::Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        let mut view = Self::with_terminal(api, term, tick_rate, shutdown);
        view.restore_terminal = true;
        Ok(view)
    }
}

impl<B: Backend> ClaimView<B> {
    fn with_terminal(
        api: VerifyApi,
        term: Terminal<B>,
        tick_rate: Duration,
        shutdown: ShutdownHandle,
    ) -> Self {
        Self {
            state: ViewState::new(),
            api,
            term,
            tick_rate,
            last_tick: Instant::now(),
            restore_terminal: false,
            scroll: 0,
            dirty: true,
            spin_idx: 0,
            notice: Some("Paste a claim and press Enter to check it.".into()),
            shutdown,
        }
    }

    /// Drain the mailbox until shutdown. State is mutated only here, on the
    /// loop's task; request tasks talk back through the mailbox.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<UiMsg>,
        tx: mpsc::Sender<UiMsg>,
    ) -> Result<()> {
        while let Some(msg) = rx.recv().await {
            if self.handle(msg, &tx)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    fn handle(&mut self, msg: UiMsg, tx: &mpsc::Sender<UiMsg>) -> Result<Flow> {
        match msg {
            UiMsg::InputEvent(ev) => {
                if let CtEvent::Key(k) = ev
                    && let Some(next) = self.handle_key(k)
                {
                    // Dispatch inline. Looping derived messages back through
                    // the mailbox would drop them when it is full.
                    return self.handle(next, tx);
                }
            }
            UiMsg::Submit => return Ok(self.route_submit(tx)),
            UiMsg::VerifyDone { seq, outcome } => {
                let outcome = match outcome {
                    Ok(verdicts) => {
                        tracing::debug!(seq, count = verdicts.len(), "verify settled ok");
                        Ok(verdicts)
                    }
                    Err(detail) => {
                        // Diagnostics only; the user sees the fixed message.
                        tracing::warn!(seq, error = %detail, "verify settled with failure");
                        Err(detail)
                    }
                };
                if self.state.settle(seq, outcome) {
                    self.scroll = 0;
                } else {
                    tracing::debug!(seq, "discarding settlement of superseded request");
                }
                self.dirty = true;
            }
            UiMsg::Tick => {
                self.step_spinner();
                if self.dirty || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.dirty = false;
                }
            }
            UiMsg::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                self.dirty = true;
            }
            UiMsg::ScrollDown => {
                self.scroll = self.scroll.saturating_add(1);
                self.dirty = true;
            }
            UiMsg::Shutdown => return Ok(self.quit()),
        }

        Ok(Flow::Continue)
    }

    fn quit(&mut self) -> Flow {
        if self.restore_terminal {
            disable_raw_mode().ok();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
        self.shutdown.signal();
        Flow::Quit
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<UiMsg> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(UiMsg::Shutdown),
            (KeyCode::Enter, KeyModifiers::ALT) => {
                self.state.insert_newline();
                self.dirty = true;
            }
            (KeyCode::Enter, _) => return Some(UiMsg::Submit),
            (KeyCode::PageUp, _) => {
                self.scroll = self.scroll.saturating_sub(5);
                self.dirty = true;
            }
            (KeyCode::PageDown, _) => {
                self.scroll = self.scroll.saturating_add(5);
                self.dirty = true;
            }
            (KeyCode::Up, _) => return Some(UiMsg::ScrollUp),
            (KeyCode::Down, _) => return Some(UiMsg::ScrollDown),
            (KeyCode::Left, _) => {
                self.state.cursor_left();
                self.dirty = true;
            }
            (KeyCode::Right, _) => {
                self.state.cursor_right();
                self.dirty = true;
            }
            (KeyCode::Home, _) => {
                self.state.cursor_home();
                self.dirty = true;
            }
            (KeyCode::End, _) => {
                self.state.cursor_end();
                self.dirty = true;
            }
            (KeyCode::Backspace, _) => {
                self.state.backspace();
                self.dirty = true;
            }
            (KeyCode::Delete, _) => {
                self.state.delete();
                self.dirty = true;
            }
            (KeyCode::Esc, _) => {
                self.state.clear_draft();
                self.dirty = true;
            }
            (KeyCode::Char(ch), _) => {
                self.state.insert_char(ch);
                self.dirty = true;
            }
            _ => {}
        }
        None
    }

    fn route_submit(&mut self, tx: &mpsc::Sender<UiMsg>) -> Flow {
        self.notice = None;
        self.dirty = true;

        let trimmed = self.state.draft().trim();
        if trimmed.starts_with('/') {
            let cmd = parse_command(trimmed);
            // Commands are not claim text; consume them from the input.
            self.state.clear_draft();
            return self.handle_command(cmd);
        }

        // The draft itself goes over the wire untrimmed; only the
        // blank-check trims.
        let text = self.state.draft().to_string();
        let Some(seq) = self.state.submit() else {
            return Flow::Continue; // validation error is already set
        };

        tracing::info!(seq, chars = text.len(), "submitting draft for verification");

        let api = self.api.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let outcome = api.verify(&text).await.map_err(|e| e.to_string());
            let _ = tx2.send(UiMsg::VerifyDone { seq, outcome }).await;
        });
        Flow::Continue
    }

    fn handle_command(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Quit => return self.quit(),
            Command::Clear => {
                self.state.clear_results();
                self.scroll = 0;
                self.notice = Some("Cleared.".into());
            }
            Command::Help => {
                self.notice =
                    Some("Enter submits • Alt+Enter newline • /clear • /quit".into());
            }
            Command::Unknown(s) => {
                self.notice = Some(format!("Unknown command: {s} (try /help)"));
            }
        }
        Flow::Continue
    }

    fn spinner(&self) -> &'static str {
        if self.state.is_busy() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.state.is_busy() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = ViewSnap {
            draft: self.state.draft().to_string(),
            cursor: self.state.cursor(),
            cards: render_cards(self.state.results()),
            error: self.state.error().map(str::to_string),
            busy: self.state.is_busy(),
            spinner: self.spinner(),
            scroll: self.scroll,
            notice: self.notice.clone(),
            result_count: self.state.results().len(),
        };

        view::draw(&mut self.term, &snap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn test_view() -> ClaimView<TestBackend> {
        // Nothing listens on this port; request tasks fail fast.
        let api = VerifyApi::new("http://127.0.0.1:9").unwrap();
        let term = Terminal::new(TestBackend::new(80, 24)).unwrap();
        ClaimView::with_terminal(api, term, Duration::from_millis(80), ShutdownHandle::new())
    }

    fn key(code: KeyCode) -> UiMsg {
        UiMsg::InputEvent(CtEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_into(view: &mut ClaimView<TestBackend>, tx: &mpsc::Sender<UiMsg>, text: &str) {
        for ch in text.chars() {
            view.handle(key(KeyCode::Char(ch)), tx).unwrap();
        }
    }

    #[tokio::test]
    async fn enter_submits_even_when_the_mailbox_is_full() {
        let mut view = test_view();
        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(UiMsg::Tick).unwrap(); // occupy the only slot

        type_into(&mut view, &tx, "claim");
        let flow = view.handle(key(KeyCode::Enter), &tx).unwrap();

        assert!(flow == Flow::Continue);
        assert!(view.state.is_busy(), "submission must not depend on mailbox space");
    }

    #[tokio::test]
    async fn quit_command_signals_shutdown_even_when_the_mailbox_is_full() {
        let mut view = test_view();
        let mut signal = view.shutdown.subscribe();
        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(UiMsg::Tick).unwrap();

        type_into(&mut view, &tx, "/quit");
        let flow = view.handle(key(KeyCode::Enter), &tx).unwrap();

        assert!(flow == Flow::Quit);
        assert!(signal.try_recv().is_ok());
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let mut view = test_view();
        let (tx, _rx) = mpsc::channel(1);
        tx.try_send(UiMsg::Tick).unwrap();

        let msg = UiMsg::InputEvent(CtEvent::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        let flow = view.handle(msg, &tx).unwrap();

        assert!(flow == Flow::Quit);
    }

    #[tokio::test]
    async fn settlement_from_the_request_task_clears_busy() {
        let mut view = test_view();
        let (tx, mut rx) = mpsc::channel(8);

        type_into(&mut view, &tx, "claim");
        view.handle(key(KeyCode::Enter), &tx).unwrap();
        assert!(view.state.is_busy());

        // The spawned request task reports back through the mailbox.
        let msg = rx.recv().await.expect("request settles");
        assert!(matches!(msg, UiMsg::VerifyDone { .. }));
        view.handle(msg, &tx).unwrap();

        assert!(!view.state.is_busy());
    }
}
