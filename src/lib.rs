//! Renshuu Maker
//!
//! Toolkit for generating English-grammar practice worksheets: assembles the
//! generation prompt, splits the sentinel-delimited completion into question,
//! answer, and spoken-script sections, and renders the sheets into printable
//! A4 PDFs via `renshuu-pdf-creator`. Model calls and speech synthesis are
//! collaborator traits supplied by the caller.

pub mod generation;
pub mod history;
pub mod maker;
pub mod prompt;
pub mod speech;
pub mod splitter;

// Re-export commonly used functions and types
pub use generation::{GenerationError, ReferenceSource, TextGenerator};
pub use history::{GenerationRecord, HistoryLog};
pub use maker::{generate_worksheet, WorksheetBundle};
pub use prompt::{build_prompt, ProblemType, WorksheetRequest, GRAMMAR_TOPICS, LEVELS};
pub use speech::{
    prepare_speech_text, SpeechSynthesizer, SynthesisError, PAUSE_FILLER, PAUSE_TOKEN,
};
pub use splitter::{
    split, ParsedDocument, SplitMode, SCRIPT_END_MARK, SPLIT_FAILURE_TEXT, SPLIT_MARK,
};

pub use renshuu_pdf_creator::{
    create_worksheet_pdf, Page, PageGeometry, PlacedText, RenderOptions, RenderedPdf, WrapMode,
};
