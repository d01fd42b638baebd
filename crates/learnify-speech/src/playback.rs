//! Word-pronunciation playback ports.
//!
//! Single active utterance: starting a new one interrupts whatever is
//! playing. Lifecycle signals are appended to a shared log so the
//! embedding application (or a test) can observe them.

use std::sync::{Arc, Mutex};

use learnify_core::traits::{PlaybackEvent, SpeechPlayback};

/// Shared, append-only record of playback lifecycle events.
#[derive(Debug, Default)]
pub struct PlaybackLog {
    events: Mutex<Vec<PlaybackEvent>>,
}

impl PlaybackLog {
    fn push(&self, event: PlaybackEvent) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<PlaybackEvent> {
        self.events.lock().unwrap().clone()
    }
}

/// Playback double whose utterances stay active until the test completes
/// them, making interruption semantics observable.
pub struct ScriptedPlayback {
    log: Arc<PlaybackLog>,
    current: Option<String>,
}

impl ScriptedPlayback {
    pub fn new() -> Self {
        Self {
            log: Arc::new(PlaybackLog::default()),
            current: None,
        }
    }

    pub fn log(&self) -> Arc<PlaybackLog> {
        Arc::clone(&self.log)
    }

    /// Let the active utterance finish naturally.
    pub fn complete_current(&mut self) {
        if let Some(text) = self.current.take() {
            self.log.push(PlaybackEvent::Ended { text });
        }
    }
}

impl Default for ScriptedPlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechPlayback for ScriptedPlayback {
    fn speak(&mut self, text: &str) {
        // New utterance interrupts the current one.
        self.cancel();
        self.log.push(PlaybackEvent::Started {
            text: text.to_string(),
        });
        self.current = Some(text.to_string());
    }

    fn cancel(&mut self) {
        if let Some(text) = self.current.take() {
            self.log.push(PlaybackEvent::Ended { text });
        }
    }
}

/// Terminal playback: prints the word instead of speaking it. Utterances
/// complete immediately, so there is never anything to interrupt.
pub struct ConsolePlayback {
    log: Arc<PlaybackLog>,
}

impl ConsolePlayback {
    pub fn new() -> Self {
        Self {
            log: Arc::new(PlaybackLog::default()),
        }
    }

    pub fn log(&self) -> Arc<PlaybackLog> {
        Arc::clone(&self.log)
    }
}

impl Default for ConsolePlayback {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechPlayback for ConsolePlayback {
    fn speak(&mut self, text: &str) {
        self.log.push(PlaybackEvent::Started {
            text: text.to_string(),
        });
        println!("  🔊 {text}");
        self.log.push(PlaybackEvent::Ended {
            text: text.to_string(),
        });
    }

    fn cancel(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_utterance_interrupts_current() {
        let mut playback = ScriptedPlayback::new();
        let log = playback.log();

        playback.speak("cat");
        playback.speak("dog");
        playback.complete_current();

        assert_eq!(
            log.events(),
            vec![
                PlaybackEvent::Started { text: "cat".into() },
                PlaybackEvent::Ended { text: "cat".into() },
                PlaybackEvent::Started { text: "dog".into() },
                PlaybackEvent::Ended { text: "dog".into() },
            ]
        );
    }

    #[test]
    fn cancel_without_active_utterance_is_a_noop() {
        let mut playback = ScriptedPlayback::new();
        let log = playback.log();
        playback.cancel();
        assert!(log.events().is_empty());
    }
}
