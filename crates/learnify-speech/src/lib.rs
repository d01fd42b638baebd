//! learnify-speech — Speech capture and playback ports.
//!
//! Implements the `SpeechCapture` and `SpeechPlayback` traits from
//! `learnify-core`. Real recognizers and synthesizers live outside the
//! engine (the capability is assumed present and correct); what this crate
//! provides are the push-model adapters an embedding application drives,
//! and deterministic doubles that replay scripted event sequences in tests.

pub mod capture;
pub mod playback;

pub use capture::{replay, CaptureProbe, ManualCapture, UnsupportedCapture};
pub use playback::{ConsolePlayback, PlaybackLog, ScriptedPlayback};
