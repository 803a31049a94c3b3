//! Core session controller implementation
//!
//! Consumes the merged input stream (recognition events plus query worker
//! completions) and applies the mode transition table. Classification and
//! dispatch run synchronously on this single control path; only query
//! workers and slow handlers run on background tasks.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::actions::{Actions, ActiveNote};
use crate::command::{normalize, Classifier, Command};
use crate::events::{RecognitionEvent, SessionInput};
use crate::query::QueryWorker;
use crate::speech::SpeechSink;

/// The assistant's conversational mode.
///
/// One tagged value instead of loose boolean flags, so incoherent
/// combinations (dictating while not listening) are unrepresentable. The
/// open note lives inside `Dictating`: a note path exists exactly when
/// dictation is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Minimized; only wake events or wake phrases act
    Sleeping,
    /// Running but not yet woken; recognized text is discarded
    Standby,
    /// Classifying and dispatching utterances
    Listening,
    /// Appending utterances to the open note
    Dictating(ActiveNote),
}

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Sleeping => "Sleeping",
            Mode::Standby => "Standby",
            Mode::Listening => "Listening",
            Mode::Dictating(_) => "Dictating",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The session state machine and command router.
pub struct SessionController {
    /// Current mode; mutated only here, on the control path
    mode: Mode,
    classifier: Classifier,
    actions: Actions,
    speech: SpeechSink,
    query: QueryWorker,
    /// Completions from dispatched workers come back through this sender
    reply_tx: mpsc::Sender<SessionInput>,
    /// Wake word, spoken back in confirmations
    wake_word: String,
    /// In-flight query workers, for observability only
    pending_queries: usize,
}

impl SessionController {
    /// Create a controller in `Standby`: running, but ignoring utterances
    /// until the first wake.
    pub fn new(
        classifier: Classifier,
        actions: Actions,
        query: QueryWorker,
        speech: SpeechSink,
        reply_tx: mpsc::Sender<SessionInput>,
        wake_word: String,
    ) -> Self {
        Self {
            mode: Mode::Standby,
            classifier,
            actions,
            speech,
            query,
            reply_tx,
            wake_word,
            pending_queries: 0,
        }
    }

    /// Current mode
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Number of query workers currently in flight
    pub fn pending_queries(&self) -> usize {
        self.pending_queries
    }

    /// Run the controller over the merged input stream.
    pub async fn run(&mut self, mut input_rx: mpsc::Receiver<SessionInput>) {
        info!(mode = %self.mode, "session controller started");

        while let Some(input) = input_rx.recv().await {
            self.handle(input);
        }

        info!("session controller stopped");
    }

    /// Process one input. Total: every `(Mode, input)` pair is defined.
    pub fn handle(&mut self, input: SessionInput) {
        match input {
            SessionInput::Recognition(RecognitionEvent::WakeDetected) => self.on_wake(),
            SessionInput::Recognition(RecognitionEvent::TextRecognized { text }) => {
                self.on_text(&normalize(&text));
            }
            SessionInput::QueryCompleted { response } => self.on_query_completed(&response),
        }
    }

    /// Wake detection is the unconditional escape hatch: it re-activates
    /// the assistant from any mode, dropping any open note.
    fn on_wake(&mut self) {
        let greeting = match self.mode {
            Mode::Sleeping => "Waking up. I'm ready.",
            _ => "Yes sir? I'm listening and ready for your commands.",
        };
        self.transition_to(Mode::Listening);
        self.speech.speak(greeting);
    }

    fn on_text(&mut self, text: &str) {
        let command = match &self.mode {
            Mode::Sleeping => match self.classifier.wake_command(text) {
                Command::Noop => {
                    debug!(text, "ignored while sleeping");
                    return;
                }
                command => command,
            },
            Mode::Standby => {
                debug!(text, "discarded before wake");
                return;
            }
            Mode::Dictating(note) => match self.classifier.dictation_command(text) {
                Some(command) => command,
                None => {
                    self.actions.append_note(note, text);
                    return;
                }
            },
            Mode::Listening => self.classifier.classify(text),
        };
        self.apply(command);
    }

    /// Apply one classified command from the current mode.
    fn apply(&mut self, command: Command) {
        debug!(?command, mode = %self.mode, "dispatching command");
        match command {
            Command::WakeUp => {
                self.transition_to(Mode::Listening);
                self.speech.speak("Waking up. I'm ready.");
            }
            Command::GoToSleep => {
                self.speech.speak(&format!(
                    "Going to sleep mode. Say {} to wake me up.",
                    self.wake_word
                ));
                self.transition_to(Mode::Standby);
            }
            Command::OpenBrowserSearch(query) => {
                self.actions.open_browser_search(query.as_deref());
            }
            Command::CloseBrowser => self.actions.close_browser(),
            Command::OpenYoutube => self.actions.open_youtube(),
            Command::OpenMediaSearch(query) => {
                self.actions.open_media_search(query.as_deref());
            }
            Command::CloseMedia => self.actions.close_media(),
            Command::OpenNotes => {
                if let Some(note) = self.actions.open_note() {
                    self.transition_to(Mode::Dictating(note));
                }
            }
            Command::CloseNotes => self.finish_notes(),
            Command::ReportTime => self.actions.report_time(),
            Command::TakeScreenshot => self.actions.take_screenshot(),
            Command::HideToBackground => {
                self.speech.speak("Minimizing to the background");
                self.transition_to(Mode::Sleeping);
            }
            Command::FreeFormQuery(prompt) => self.dispatch_query(prompt),
            Command::Noop => {}
        }
    }

    fn finish_notes(&mut self) {
        if matches!(self.mode, Mode::Dictating(_)) {
            self.transition_to(Mode::Listening);
            self.speech.speak("Notes closed");
        } else {
            debug!("no open note, close ignored");
        }
    }

    /// Hand a free-form utterance to a background worker. The controller
    /// stays responsive while the query runs; several may be in flight at
    /// once, with no cancellation and no ordering between them.
    fn dispatch_query(&mut self, prompt: String) {
        self.pending_queries += 1;
        info!(pending = self.pending_queries, "dispatching free-form query");
        self.query.dispatch(prompt, self.reply_tx.clone());
    }

    /// Reconcile a worker completion, in completion order.
    ///
    /// Listening is forced back on so the assistant is always ready after
    /// an answer, even if the user slept during the wait. Dictation is the
    /// one exception: forcing the mode there would discard an open note as
    /// a side effect of an unrelated answer.
    fn on_query_completed(&mut self, response: &str) {
        self.pending_queries = self.pending_queries.saturating_sub(1);
        info!(pending = self.pending_queries, "query response received");
        self.speech.speak(response);
        if !matches!(self.mode, Mode::Dictating(_)) {
            self.transition_to(Mode::Listening);
        }
    }

    fn transition_to(&mut self, next: Mode) {
        if self.mode != next {
            info!(from = %self.mode, to = %next, "mode transition");
        }
        self.mode = next;
    }
}
