//! Sentinel-delimited completion splitting.
//!
//! One generation call returns a single text blob; the sentinels below carve
//! it into the learner-facing question sheet, the answer/explanation sheet,
//! and (in listening mode) the spoken script. Splitting never fails: a
//! missing sentinel degrades to a best-effort document and the `*_found`
//! flags record which fallback was taken.

use log::warn;
use serde::{Deserialize, Serialize};

/// Separates the learner-facing section from the answer section.
pub const SPLIT_MARK: &str = "|||SPLIT|||";

/// Listening mode only: separates the spoken script from the remainder.
pub const SCRIPT_END_MARK: &str = "|||SCRIPT_END|||";

/// Placeholder answer when no `SPLIT_MARK` was found.
pub const SPLIT_FAILURE_TEXT: &str = "分割失敗";

/// Header prefixed to listening-mode answer sheets so the printed answers
/// always carry the full spoken script.
const SCRIPT_HEADER: &str = "【放送文(Script)】";
const SCRIPT_RULE: &str = "----------------";

/// Markup tokens the model sometimes emits despite being told not to.
const MARKUP_TOKENS: [&str; 3] = ["**", "##", "__"];

/// Labels stripped from the start of the script section when present.
const SCRIPT_LABELS: [&str; 3] = ["Title:", "Script:", "[放送文]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitMode {
    Plain,
    Listening,
}

/// The structured result of splitting one completion.
///
/// `question` and `answer` are always populated; `script` only when listening
/// mode was requested and `SCRIPT_END_MARK` was found. The booleans record
/// whether a fallback path was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub question: String,
    pub answer: String,
    pub script: String,
    pub split_found: bool,
    pub script_found: bool,
}

/// Split one raw completion. Pure text transformation; accepts any input
/// including the empty string.
pub fn split(raw: &str, mode: SplitMode) -> ParsedDocument {
    let text = normalize(raw);
    match mode {
        SplitMode::Plain => {
            let (question, answer, split_found) = split_plain(&text);
            ParsedDocument {
                question,
                answer,
                script: String::new(),
                split_found,
                script_found: false,
            }
        }
        SplitMode::Listening => split_listening(&text),
    }
}

/// Strip literal emphasis markup. Plain substring removal, not a parser.
fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    for token in MARKUP_TOKENS {
        text = text.replace(token, "");
    }
    text
}

/// Partition at the first `SPLIT_MARK`; later occurrences stay literal
/// content of the answer.
fn split_plain(text: &str) -> (String, String, bool) {
    match text.split_once(SPLIT_MARK) {
        Some((before, after)) => (before.trim().to_string(), after.trim().to_string(), true),
        None => {
            warn!("no {} sentinel in completion; using failure placeholder", SPLIT_MARK);
            (text.to_string(), SPLIT_FAILURE_TEXT.to_string(), false)
        }
    }
}

fn split_listening(text: &str) -> ParsedDocument {
    match text.split_once(SCRIPT_END_MARK) {
        Some((script_part, rest_part)) => {
            let script = strip_script_labels(script_part.trim());
            let (question, plain_answer, split_found) = split_plain(rest_part.trim());
            // Answer sheets carry the full script, whether or not the inner
            // split succeeded.
            let answer = format!(
                "{SCRIPT_HEADER}\n\n{script}\n\n{SCRIPT_RULE}\n\n{plain_answer}"
            );
            ParsedDocument {
                question,
                answer,
                script,
                split_found,
                script_found: true,
            }
        }
        None => {
            warn!("no {} sentinel in listening completion; degrading to plain split", SCRIPT_END_MARK);
            let (question, answer, split_found) = split_plain(text);
            ParsedDocument {
                question,
                answer,
                script: String::new(),
                split_found,
                script_found: false,
            }
        }
    }
}

/// Remove known labels from the start of the script, repeatedly. Labels
/// occurring later in the text are kept.
fn strip_script_labels(script: &str) -> String {
    let mut rest = script.trim();
    loop {
        let mut stripped = false;
        for label in SCRIPT_LABELS {
            if let Some(tail) = rest.strip_prefix(label) {
                rest = tail.trim_start();
                stripped = true;
            }
        }
        if !stripped {
            break;
        }
    }
    rest.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_well_formed_round_trip() {
        let raw = format!("  Question text\nLine two {SPLIT_MARK} Answer body ");
        let parsed = split(&raw, SplitMode::Plain);
        assert_eq!(parsed.question, "Question text\nLine two");
        assert_eq!(parsed.answer, "Answer body");
        assert!(parsed.split_found);
        assert!(!parsed.script_found);
        assert!(parsed.script.is_empty());
    }

    #[test]
    fn plain_missing_sentinel_degrades() {
        let parsed = split("no markers here", SplitMode::Plain);
        assert_eq!(parsed.question, "no markers here");
        assert_eq!(parsed.answer, SPLIT_FAILURE_TEXT);
        assert!(!parsed.split_found);
    }

    #[test]
    fn only_first_sentinel_honored() {
        let raw = format!("A{SPLIT_MARK}B{SPLIT_MARK}C");
        let parsed = split(&raw, SplitMode::Plain);
        assert_eq!(parsed.question, "A");
        assert_eq!(parsed.answer, format!("B{SPLIT_MARK}C"));
    }

    #[test]
    fn listening_three_part_round_trip() {
        let raw = format!("SC{SCRIPT_END_MARK}Q{SPLIT_MARK}A");
        let parsed = split(&raw, SplitMode::Listening);
        assert_eq!(parsed.script, "SC");
        assert_eq!(parsed.question, "Q");
        assert!(parsed.answer.contains("SC"));
        assert!(parsed.answer.contains('A'));
        assert!(parsed.split_found);
        assert!(parsed.script_found);
    }

    #[test]
    fn listening_without_script_mark_degrades_to_plain() {
        let raw = format!("Q{SPLIT_MARK}A");
        let parsed = split(&raw, SplitMode::Listening);
        assert_eq!(parsed.question, "Q");
        assert_eq!(parsed.answer, "A");
        assert!(parsed.script.is_empty());
        assert!(!parsed.script_found);
        assert!(parsed.split_found);
    }

    #[test]
    fn listening_answer_carries_script_even_on_inner_failure() {
        let raw = format!("The story.{SCRIPT_END_MARK}choices without answers");
        let parsed = split(&raw, SplitMode::Listening);
        assert_eq!(parsed.question, "choices without answers");
        assert!(parsed.answer.contains("The story."));
        assert!(parsed.answer.contains(SPLIT_FAILURE_TEXT));
        assert!(parsed.script_found);
        assert!(!parsed.split_found);
    }

    #[test]
    fn normalization_strips_markup_tokens() {
        let raw = format!("**Bold** and ##head## and __under__{SPLIT_MARK}ans");
        let parsed = split(&raw, SplitMode::Plain);
        assert_eq!(parsed.question, "Bold and head and under");
    }

    #[test]
    fn script_labels_stripped_only_at_start() {
        let raw = format!(
            "Title: Script: A walk.\nSee Title: inside.{SCRIPT_END_MARK}Q{SPLIT_MARK}A"
        );
        let parsed = split(&raw, SplitMode::Listening);
        assert_eq!(parsed.script, "A walk.\nSee Title: inside.");
    }

    #[test]
    fn empty_sections_are_valid() {
        let parsed = split(SPLIT_MARK, SplitMode::Plain);
        assert_eq!(parsed.question, "");
        assert_eq!(parsed.answer, "");
        assert!(parsed.split_found);
    }

    #[test]
    fn empty_input_never_panics() {
        let plain = split("", SplitMode::Plain);
        assert_eq!(plain.question, "");
        assert_eq!(plain.answer, SPLIT_FAILURE_TEXT);

        let listening = split("", SplitMode::Listening);
        assert_eq!(listening.answer, SPLIT_FAILURE_TEXT);
        assert!(listening.script.is_empty());
    }

    #[test]
    fn scenario_plain_example() {
        let parsed = split("Hello\nWorld|||SPLIT|||Answer: Hi", SplitMode::Plain);
        assert_eq!(parsed.question, "Hello\nWorld");
        assert_eq!(parsed.answer, "Answer: Hi");
    }

    #[test]
    fn scenario_listening_example() {
        let parsed = split("Talk.|||SCRIPT_END|||Q1?|||SPLIT|||A1.", SplitMode::Listening);
        assert_eq!(parsed.script, "Talk.");
        assert_eq!(parsed.question, "Q1?");
        assert!(parsed.answer.contains("Talk."));
        assert!(parsed.answer.contains("A1."));
    }
}
