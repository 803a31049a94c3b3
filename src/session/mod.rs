//! Session state machine
//!
//! Owns the assistant's conversational mode and routes every recognized
//! utterance to an action handler, the dictation path, or an asynchronous
//! query worker:
//! - Sleeping: minimized; only wake events or wake phrases act
//! - Standby: running but not yet woken; recognized text is discarded
//! - Listening: utterances are classified and dispatched
//! - Dictating: utterances append to the open note until terminated

mod controller;

pub use controller::SessionController;
