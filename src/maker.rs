//! Request orchestration: prompt → generate → split → synthesize → render.
//!
//! Fully synchronous; one request runs to completion. The only hard error is
//! an upstream generation failure — everything downstream degrades instead.

use anyhow::Result;
use log::warn;
use renshuu_pdf_creator::{create_worksheet_pdf, RenderOptions, RenderedPdf};

use crate::generation::{ReferenceSource, TextGenerator};
use crate::prompt::{build_prompt, ProblemType, WorksheetRequest};
use crate::speech::{prepare_speech_text, SpeechSynthesizer};
use crate::splitter::{split, ParsedDocument};

/// Everything one successful generation produces.
#[derive(Debug)]
pub struct WorksheetBundle {
    pub parsed: ParsedDocument,
    pub question_pdf: RenderedPdf,
    pub answer_pdf: RenderedPdf,
    /// Synthesized audio, present only for listening worksheets whose
    /// synthesis call succeeded.
    pub audio: Option<Vec<u8>>,
    pub degraded_font: bool,
}

/// Run one worksheet generation end to end.
pub fn generate_worksheet(
    generator: &dyn TextGenerator,
    synthesizer: Option<&dyn SpeechSynthesizer>,
    reference: Option<&dyn ReferenceSource>,
    request: &WorksheetRequest,
    render_options: &RenderOptions,
) -> Result<WorksheetBundle> {
    let mut request = request.clone();
    if request.reference_text.is_none() {
        if let Some(source) = reference {
            request.reference_text = source.reference_text(&request.topics);
        }
    }

    let prompt = build_prompt(&request);
    let raw = generator.generate(&prompt, &request.model)?;
    let parsed = split(&raw, request.problem_type.split_mode());

    let mut audio = None;
    if request.problem_type == ProblemType::Listening && !parsed.script.is_empty() {
        if let Some(synth) = synthesizer {
            match synth.synthesize(&prepare_speech_text(&parsed.script)) {
                Ok(bytes) => audio = Some(bytes),
                Err(e) => warn!("speech synthesis failed, continuing without audio: {e}"),
            }
        }
    }

    let question_pdf = create_worksheet_pdf(&parsed.question, render_options)?;
    let answer_pdf = create_worksheet_pdf(&parsed.answer, render_options)?;
    let degraded_font = question_pdf.degraded_font || answer_pdf.degraded_font;

    Ok(WorksheetBundle {
        parsed,
        question_pdf,
        answer_pdf,
        audio,
        degraded_font,
    })
}
