//! Worksheet prompt assembly.
//!
//! Builds the natural-language instruction handed to the generation
//! collaborator. The templates embed the sentinel markers so the returned
//! completion can be carved up by the splitter.

use serde::{Deserialize, Serialize};

use crate::speech::PAUSE_TOKEN;
use crate::splitter::{SplitMode, SCRIPT_END_MARK, SPLIT_MARK};

/// Grammar topics offered to the teacher.
pub const GRAMMAR_TOPICS: [&str; 16] = [
    "be動詞 (現在)",
    "一般動詞 (現在)",
    "疑問文・否定文の作り方",
    "疑問詞 (5W1H)",
    "命令文",
    "三人称単数現在 (三単現)",
    "現在進行形",
    "can (助動詞)",
    "一般動詞の過去形",
    "名詞の複数形",
    "代名詞 (I, my, me, mine等)",
    "be動詞 (過去)",
    "過去進行形",
    "不定詞",
    "動名詞",
    "比較",
];

/// Target difficulty levels.
pub const LEVELS: [&str; 5] = [
    "中学1年基礎",
    "中学1年応用",
    "中学2年基礎",
    "中学2年応用",
    "中学3年受験",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemType {
    /// Listening comprehension with a spoken script.
    Listening,
    /// Four-choice fill-in-the-blank grammar questions.
    Choice4,
    /// English sentences to translate into Japanese.
    EngToJpn,
    /// Japanese sentences to translate into English.
    JpnToEng,
    /// Long-passage reading comprehension.
    Reading,
}

impl ProblemType {
    /// Which splitting mode this problem type produces.
    pub fn split_mode(&self) -> SplitMode {
        match self {
            ProblemType::Listening => SplitMode::Listening,
            _ => SplitMode::Plain,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProblemType::Listening => "リスニング問題 (Listening)",
            ProblemType::Choice4 => "4択問題 (Grammar)",
            ProblemType::EngToJpn => "和訳問題 (Eng → Jap)",
            ProblemType::JpnToEng => "英訳問題 (Jap → Eng)",
            ProblemType::Reading => "長文読解 (Reading)",
        }
    }
}

/// One worksheet generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetRequest {
    pub topics: Vec<String>,
    pub problem_type: ProblemType,
    pub level: String,
    pub question_count: u8,
    pub model: String,
    /// Auxiliary reference material appended to the prompt, opaque otherwise.
    pub reference_text: Option<String>,
}

/// Assemble the full prompt string for one request.
pub fn build_prompt(request: &WorksheetRequest) -> String {
    let topic = request.topics.join("、");

    let mix_instruction = if request.topics.len() <= 1 {
        format!("ターゲット文法「{topic}」を集中的に使用してください。")
    } else {
        format!("ターゲット文法「{topic}」をなるべく全て使用・網羅するように構成してください。")
    };

    let instruction = match request.problem_type {
        ProblemType::Listening => format!(
            "ターゲット文法「{topic}」を使ったリスニングテスト（物語形式）を作成してください。\n\
             \n\
             【超重要：構成ルール】\n\
             以下の順番でテキストを出力すること。冒頭にタイトルや挨拶を一切書かないこと。\n\
             \n\
             1. [放送文パート]:\n\
                - いきなり英語の物語(Story)から書き始めること。\n\
                - 物語の直後に \"Question 1: ...\", \"Question 2: ...\" と質問文を続けること。\n\
                - 質問の間には `{PAUSE_TOKEN}` を入れること。\n\
                - 日本語訳や注釈は一切含めないこと（英語のみ）。\n\
             \n\
             2. {SCRIPT_END_MARK} (この区切り文字を入れる)\n\
             \n\
             3. [生徒用問題用紙パート]:\n\
                - 質問文は書かず、4つの選択肢 (A)(B)(C)(D) のみを記述すること。\n\
                - タイトル: {topic} 確認テスト\n\
                - 名前欄: ______________\n\
             \n\
             4. {SPLIT_MARK} (この区切り文字を入れる)\n\
             \n\
             5. [解答パート]:\n\
                - 解答と解説、放送文のスクリプト（和訳付き）を記述。"
        ),
        ProblemType::Choice4 => format!(
            "文法「{topic}」の4択穴埋め問題。(A)(B)(C)(D)形式。指示: {mix_instruction}\n\
             構成: [問題用紙] -> {SPLIT_MARK} -> [解答]\n\
             問題用紙の冒頭にタイトルと名前欄をつけること。"
        ),
        ProblemType::EngToJpn => format!(
            "文法「{topic}」を使った英語短文とその和訳問題。指示: {mix_instruction}\n\
             構成: [問題用紙] -> {SPLIT_MARK} -> [解答]\n\
             問題用紙の冒頭にタイトルと名前欄をつけること。"
        ),
        ProblemType::JpnToEng => format!(
            "文法「{topic}」を使った日本語短文とその英訳問題。指示: {mix_instruction}\n\
             構成: [問題用紙] -> {SPLIT_MARK} -> [解答]\n\
             問題用紙の冒頭にタイトルと名前欄をつけること。"
        ),
        ProblemType::Reading => format!(
            "文法「{topic}」を使った英語長文とその読解問題。指示: {mix_instruction}\n\
             構成: [問題用紙] -> {SPLIT_MARK} -> [解答]\n\
             問題用紙の冒頭にタイトルと名前欄をつけること。"
        ),
    };

    let mut prompt = format!(
        "あなたは日本の中学校英語教師です。以下の条件でテストを作成してください。\n\
         条件: レベル[{}] 問題数[{}]\n\
         指示: {}\n\
         禁止: マークダウン記号(**など)\n",
        request.level, request.question_count, instruction
    );

    if let Some(reference) = &request.reference_text {
        prompt.push_str("\n参考資料（この内容に沿って出題すること）:\n");
        prompt.push_str(reference);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(problem_type: ProblemType) -> WorksheetRequest {
        WorksheetRequest {
            topics: vec!["be動詞 (現在)".to_string()],
            problem_type,
            level: "中学1年基礎".to_string(),
            question_count: 5,
            model: "gpt-4o-mini".to_string(),
            reference_text: None,
        }
    }

    #[test]
    fn plain_prompt_embeds_split_mark_and_conditions() {
        let prompt = build_prompt(&request(ProblemType::Choice4));
        assert!(prompt.contains(SPLIT_MARK));
        assert!(!prompt.contains(SCRIPT_END_MARK));
        assert!(prompt.contains("中学1年基礎"));
        assert!(prompt.contains("問題数[5]"));
        assert!(prompt.contains("be動詞 (現在)"));
    }

    #[test]
    fn listening_prompt_embeds_all_sentinels() {
        let prompt = build_prompt(&request(ProblemType::Listening));
        assert!(prompt.contains(SPLIT_MARK));
        assert!(prompt.contains(SCRIPT_END_MARK));
        assert!(prompt.contains(PAUSE_TOKEN));
    }

    #[test]
    fn multiple_topics_use_coverage_instruction() {
        let mut req = request(ProblemType::Choice4);
        req.topics = vec!["不定詞".to_string(), "動名詞".to_string()];
        let prompt = build_prompt(&req);
        assert!(prompt.contains("不定詞、動名詞"));
        assert!(prompt.contains("網羅"));
    }

    #[test]
    fn reference_text_is_appended() {
        let mut req = request(ProblemType::Reading);
        req.reference_text = Some("教科書 p.42 の本文".to_string());
        let prompt = build_prompt(&req);
        assert!(prompt.contains("参考資料"));
        assert!(prompt.contains("教科書 p.42 の本文"));
    }

    #[test]
    fn split_modes_follow_problem_type() {
        assert_eq!(ProblemType::Listening.split_mode(), SplitMode::Listening);
        assert_eq!(ProblemType::Choice4.split_mode(), SplitMode::Plain);
        assert_eq!(ProblemType::Reading.split_mode(), SplitMode::Plain);
    }
}
