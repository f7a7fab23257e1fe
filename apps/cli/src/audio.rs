//! Sequential speech playback for the listen mode.
//!
//! Playback is strictly ordered: each clip is fetched and played to
//! completion before the next one starts, and a shared cancellation flag is
//! checked before every clip so "play all" can be aborted mid-flight.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlcards_core::{Card, GameSettings};

use crate::error::{AppError, Result};
use crate::openai::OpenAiClient;

/// The text spoken for a card, assembled from the listen toggles.
pub fn speech_text(card: &Card, settings: &GameSettings) -> String {
    let mut text = String::new();
    if settings.listen_speak_explanation {
        text.push_str(&card.command);
        text.push_str(". ");
        text.push_str(&card.description);
        text.push_str(". ");
    }
    if settings.listen_speak_example {
        if let Some(example) = &card.example {
            text.push_str("Example: ");
            text.push_str(example);
        }
    }
    text.trim().to_string()
}

/// Anything that can turn speech text into audio bytes.
pub trait SpeechSource {
    async fn synthesize(&mut self, text: &str) -> Result<Vec<u8>>;
}

impl SpeechSource for OpenAiClient {
    async fn synthesize(&mut self, text: &str) -> Result<Vec<u8>> {
        OpenAiClient::synthesize(self, text).await
    }
}

/// Plays one clip to completion (or fails).
pub trait AudioSink {
    fn play(&mut self, label: &str, clip: &[u8]) -> Result<()>;
}

/// A sink that writes clips to numbered files; the terminal stand-in for an
/// audio device.
pub struct FileSink {
    dir: PathBuf,
    count: usize,
}

impl FileSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, count: 0 }
    }
}

impl AudioSink for FileSink {
    fn play(&mut self, label: &str, clip: &[u8]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let slug: String = label
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let path = self.dir.join(format!("{:03}-{slug}.mp3", self.count));
        std::fs::write(&path, clip)?;
        self.count += 1;
        println!("  saved audio to {}", path.display());
        Ok(())
    }
}

/// Play every card in order. Returns the number of clips played; stops
/// early when `cancel` is set or a clip fails.
pub async fn play_all<S: SpeechSource>(
    cards: &[Card],
    settings: &GameSettings,
    source: &mut S,
    sink: &mut dyn AudioSink,
    cancel: &AtomicBool,
) -> Result<usize> {
    let mut played = 0;
    for card in cards {
        if cancel.load(Ordering::SeqCst) {
            break;
        }
        let text = speech_text(card, settings);
        if text.is_empty() {
            continue;
        }
        let clip = source.synthesize(&text).await?;
        sink.play(&card.command, &clip)
            .map_err(|error| AppError::Audio(error.to_string()))?;
        played += 1;
    }
    Ok(played)
}
