// src/llm/prompt.rs

use crate::models::question::GenerateRequest;

use super::ChatMessage;

/// Renders the generation prompt for `req`.
///
/// A non-blank `prompt` on the request is used verbatim. Returns `None` when
/// there is neither a raw prompt nor an exam name to build one from.
pub fn build_prompt(req: &GenerateRequest) -> Option<String> {
    if let Some(raw) = req.raw_prompt() {
        return Some(raw.to_string());
    }
    let exam_type = req.exam_type()?;

    let mut prompt = format!(
        "「{exam_type}」に関する4択問題を{count}問作成してください。\n難易度: {difficulty}\n",
        count = req.question_count,
        difficulty = req.difficulty.label(),
    );

    if let Some(url) = req.reference_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        prompt.push_str(&format!("\n次のURLの内容を参考にしてください: {url}\n"));
    }
    if let Some(text) = req.reference_text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        prompt.push_str(&format!("\n次の学習資料の内容を参考にしてください:\n---\n{text}\n---\n"));
    }

    prompt.push_str(
        "\n出力は次の形式のJSONのみとし、説明文やコードブロックは付けないでください。\n\
         {\"questions\": [{\"question\": \"問題文\", \"options\": [\"選択肢1\", \"選択肢2\", \"選択肢3\", \"選択肢4\"], \"answer\": 0, \"explanation\": \"解説\"}]}\n\
         answer は正解の選択肢の0始まりのインデックス、explanation は正解の理由です。",
    );

    Some(prompt)
}

/// System message followed by the user prompt.
pub fn conversation(system_prompt: &str, prompt: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)]
}
