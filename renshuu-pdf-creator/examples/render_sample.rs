//! Render a block of mixed Japanese/English worksheet text to render_sample.pdf.

use renshuu_pdf_creator::{create_worksheet_pdf, RenderOptions};

fn main() -> anyhow::Result<()> {
    println!("Rendering sample worksheet text...");

    let text = "be動詞 確認テスト\n\
                名前: ______________\n\
                \n\
                Question 1: I (  ) a student.\n\
                (A) am (B) is (C) are (D) be\n\
                \n\
                Question 2: She (  ) my friend.\n\
                (A) am (B) is (C) are (D) be\n";

    let rendered = create_worksheet_pdf(text, &RenderOptions::default())?;
    std::fs::write("render_sample.pdf", &rendered.bytes)?;

    println!(
        "Wrote render_sample.pdf: {} pages, degraded font: {}",
        rendered.page_count, rendered.degraded_font
    );

    Ok(())
}
