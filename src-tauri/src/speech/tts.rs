//! Text-to-speech through the Google Translate TTS endpoint.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::error::TutorError;

const TTS_URL: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects requests longer than this many characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// File name the rendered audio is written to, overwritten on each call.
pub const VOICE_FILE_NAME: &str = "voice.mp3";

/// Split text into pieces of at most `max_chars`, breaking on whitespace
/// where possible and hard-splitting words that are longer than a chunk.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current.chars().count() + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Render text to MP3 bytes.
pub async fn synthesize(text: &str, lang: &str) -> Result<Vec<u8>, TutorError> {
    let chunks = chunk_text(text, MAX_CHUNK_CHARS);
    if chunks.is_empty() {
        return Err(TutorError::Speech("Nothing to speak".to_string()));
    }

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| TutorError::Speech(format!("Failed to build HTTP client: {}", e)))?;

    let total = chunks.len().to_string();
    let mut audio = Vec::new();
    for (idx, chunk) in chunks.iter().enumerate() {
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();
        let response = client
            .get(TTS_URL)
            .query(&[
                ("ie", "UTF-8"),
                ("q", chunk.as_str()),
                ("tl", lang),
                ("client", "tw-ob"),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| TutorError::Speech(format!("TTS request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!("TTS endpoint returned {} for chunk {}", status, idx);
            return Err(TutorError::Speech(format!("TTS service returned {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TutorError::Speech(format!("Failed to read TTS audio: {}", e)))?;
        audio.extend_from_slice(&bytes);
    }

    info!("Synthesized {} chunks into {} bytes of MP3", chunks.len(), audio.len());
    Ok(audio)
}

/// Render text and write it to `voice.mp3` inside `dir`.
pub async fn speak_to_file(text: &str, lang: &str, dir: &Path) -> Result<(PathBuf, Vec<u8>), TutorError> {
    let audio = synthesize(text, lang).await?;

    std::fs::create_dir_all(dir)
        .map_err(|e| TutorError::Speech(format!("Failed to create audio dir: {}", e)))?;
    let path = dir.join(VOICE_FILE_NAME);
    std::fs::write(&path, &audio)
        .map_err(|e| TutorError::Speech(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok((path, audio))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_text_short() {
        assert_eq!(chunk_text("Hello there", 100), vec!["Hello there"]);
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn test_chunk_text_respects_limit() {
        let text = "The mitochondria is the powerhouse of the cell and it produces ATP through respiration in several stages";
        let chunks = chunk_text(text, 30);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30, "chunk too long: {:?}", chunk);
        }
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_chunk_text_hard_splits_long_words() {
        let chunks = chunk_text("ab abcdefghij cd", 4);
        assert_eq!(chunks, vec!["ab", "abcd", "efgh", "ij", "cd"]);
    }

    #[tokio::test]
    async fn test_synthesize_empty_text_fails_fast() {
        let result = synthesize("  \n ", "en").await;
        assert!(matches!(result, Err(TutorError::Speech(_))));
    }
}
