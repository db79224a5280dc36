//! Generate a worksheet end to end with a canned completion and write the
//! question/answer PDFs next to the binary.

use renshuu_maker::{
    generate_worksheet, GenerationError, ProblemType, RenderOptions, TextGenerator,
    WorksheetRequest, SPLIT_MARK,
};

struct CannedGenerator;

impl TextGenerator for CannedGenerator {
    fn generate(&self, _prompt: &str, _model: &str) -> Result<String, GenerationError> {
        Ok(format!(
            "be動詞 確認テスト\n名前: ______________\n\n\
             Question 1: I (  ) a student.\n(A) am (B) is (C) are (D) be\n\n\
             Question 2: They (  ) happy.\n(A) am (B) is (C) are (D) be\n\
             {SPLIT_MARK}\n\
             解答\n1: (A) am — 主語が I なので am。\n2: (C) are — 主語が複数なので are。"
        ))
    }
}

fn main() -> anyhow::Result<()> {
    println!("Generating a sample worksheet...");

    let request = WorksheetRequest {
        topics: vec!["be動詞 (現在)".to_string()],
        problem_type: ProblemType::Choice4,
        level: "中学1年基礎".to_string(),
        question_count: 2,
        model: "gpt-4o-mini".to_string(),
        reference_text: None,
    };

    let bundle = generate_worksheet(
        &CannedGenerator,
        None,
        None,
        &request,
        &RenderOptions::default(),
    )?;

    std::fs::write("question.pdf", &bundle.question_pdf.bytes)?;
    std::fs::write("answer.pdf", &bundle.answer_pdf.bytes)?;

    println!(
        "Wrote question.pdf ({} pages) and answer.pdf ({} pages)",
        bundle.question_pdf.page_count, bundle.answer_pdf.page_count
    );
    if bundle.degraded_font {
        println!("Note: ipaexg.ttf not found, Japanese text will be corrupted in the PDFs");
    }

    Ok(())
}
