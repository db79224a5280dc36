//! Speech-synthesis collaborator seam and script preparation.
//!
//! The splitter returns the spoken script unexpanded for display and PDF
//! purposes; `prepare_speech_text` produces the variant actually read aloud.

use thiserror::Error;

/// Inline placeholder for an audible pause in the spoken script.
pub const PAUSE_TOKEN: &str = "[PAUSE]";

/// What `PAUSE_TOKEN` expands to before synthesis.
pub const PAUSE_FILLER: &str = " ... ... ... ";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech synthesis failed: {0}")]
    Upstream(String),
}

/// Turns prepared script text into an audio byte stream.
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str) -> Result<Vec<u8>, SynthesisError>;
}

/// Prepare script text for synthesis: expand pause placeholders and drop any
/// leftover title lines the model was told not to emit.
pub fn prepare_speech_text(script: &str) -> String {
    let expanded = script.replace(PAUSE_TOKEN, PAUSE_FILLER);
    expanded
        .split('\n')
        .filter(|line| !line.trim().to_lowercase().starts_with("title"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_tokens_expand_to_fillers() {
        let prepared = prepare_speech_text("Question 1?[PAUSE]Question 2?");
        assert_eq!(prepared, format!("Question 1?{PAUSE_FILLER}Question 2?"));
    }

    #[test]
    fn title_lines_are_dropped_case_insensitively() {
        let script = "Title: My Story\ntitle again\nThe story begins.\n  TITLE: indented";
        assert_eq!(prepare_speech_text(script), "The story begins.");
    }

    #[test]
    fn title_inside_a_line_is_kept() {
        let script = "The book title was long.";
        assert_eq!(prepare_speech_text(script), script);
    }

    #[test]
    fn empty_script_stays_empty() {
        assert_eq!(prepare_speech_text(""), "");
    }
}
