//! Recovers the JSON payload from raw chat-completion text
//!
//! Models are told to answer with bare JSON but regularly wrap it in a
//! ```` ```json ```` fence or surround it with a sentence or two of prose.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::error::ExtractError;

static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```[ \t]*(?:json)?").expect("fence pattern is valid"));

/// Parses the JSON carried by a model reply.
///
/// Tried in order, first success wins:
/// 1. the trimmed text as-is
/// 2. the text with every JSON code-fence marker removed
/// 3. the outermost `{…}` and `[…]` spans, earliest start first, each
///    followed by the balanced block opening at the same offset
/// 4. the first balanced `{…}` / `[…]` block anywhere in the text
pub fn unwrap_response(raw: &str) -> Result<Value, ExtractError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractError::malformed("model output is empty"));
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    let stripped = strip_fences(trimmed);
    let direct_err = match serde_json::from_str::<Value>(&stripped) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    for (start, span) in outer_spans(&stripped) {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            tracing::debug!("recovered JSON from an embedded span");
            return Ok(value);
        }
        if let Some(value) = balanced_block_at(&stripped[start..]) {
            tracing::debug!("recovered JSON from a balanced block");
            return Ok(value);
        }
    }

    if let Some(value) = first_balanced_block(&stripped) {
        tracing::debug!("recovered JSON from a balanced block");
        return Ok(value);
    }

    Err(ExtractError::malformed(format!(
        "no JSON object or array found ({direct_err})"
    )))
}

/// Removes every opening and closing JSON fence marker and trims the rest.
pub fn strip_fences(text: &str) -> String {
    FENCE.replace_all(text, "").trim().to_string()
}

/// First `{` to last `}` and first `[` to last `]`, ordered by start offset.
fn outer_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans: Vec<(usize, &str)> = [('{', '}'), ('[', ']')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = text.find(open)?;
            let end = text.rfind(close)?;
            (end > start).then(|| (start, &text[start..=end]))
        })
        .collect();

    spans.sort_by_key(|(start, _)| *start);
    spans
}

/// The earliest balanced block that parses.
fn first_balanced_block(text: &str) -> Option<Value> {
    balanced_blocks(text)
        .into_iter()
        .find_map(|(start, end)| serde_json::from_str::<Value>(&text[start..end]).ok())
}

/// Byte ranges of every balanced `{…}` / `[…]` block, found in a single pass
/// and ordered by start offset.
///
/// Quotes only open a string inside a block, so a stray quote in prose does
/// not swallow the JSON after it. A mismatched closer abandons every block
/// still open.
fn balanced_blocks(text: &str) -> Vec<(usize, usize)> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut blocks = Vec::new();
    let mut in_str = false;
    let mut esc = false;

    for (i, ch) in text.char_indices() {
        if in_str {
            if esc {
                esc = false;
            } else if ch == '\\' {
                esc = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }

        match ch {
            '"' if !stack.is_empty() => in_str = true,
            '{' | '[' => stack.push((ch, i)),
            '}' | ']' => match stack.pop() {
                Some((open, start)) if (open == '{') == (ch == '}') => {
                    blocks.push((start, i + ch.len_utf8()));
                }
                Some(_) => stack.clear(),
                None => {}
            },
            _ => {}
        }
    }

    blocks.sort_unstable_by_key(|(start, _)| *start);
    blocks
}

fn balanced_block_at(text: &str) -> Option<Value> {
    let end = balanced_end(text)?;
    serde_json::from_str::<Value>(&text[..end]).ok()
}

/// Byte length of the balanced block at the start of `text`, if it closes.
fn balanced_end(text: &str) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_str = false;
    let mut esc = false;

    for (i, ch) in text.char_indices() {
        if in_str {
            if esc {
                esc = false;
            } else if ch == '\\' {
                esc = true;
            } else if ch == '"' {
                in_str = false;
            }
            continue;
        }

        match ch {
            '"' => in_str = true,
            '{' | '[' => stack.push(ch),
            '}' | ']' => {
                let open = stack.pop()?;
                if (open == '{') != (ch == '}') {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i + ch.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_bare_json() {
        let value = unwrap_response(r#"{"questions": []}"#).unwrap();
        assert_eq!(value, json!({ "questions": [] }));
    }

    #[test]
    fn serialized_payload_round_trips_exactly() {
        let payload = json!([
            {
                "question": "Which fence opens a block? ```json",
                "options": ["```", "~~~"],
                "answer": 0,
                "explanation": "Markdown uses ``` for code."
            }
        ]);

        let raw = serde_json::to_string(&payload).unwrap();
        assert_eq!(unwrap_response(&raw).unwrap(), payload);
    }

    #[test]
    fn fenced_with_language_tag_matches_unfenced() {
        let body = r#"{"questions": [{"question": "Q", "options": ["a"], "answer": 0}]}"#;
        let fenced = format!("```json\n{body}\n```");

        assert_eq!(
            unwrap_response(&fenced).unwrap(),
            unwrap_response(body).unwrap()
        );
    }

    #[test]
    fn fence_tag_is_case_insensitive_and_optional() {
        assert_eq!(unwrap_response("```JSON\n[1, 2]\n```").unwrap(), json!([1, 2]));
        assert_eq!(unwrap_response("```\n[1, 2]\n```").unwrap(), json!([1, 2]));
    }

    #[test]
    fn recovers_object_from_surrounding_prose() {
        let raw = "Sure! Here are your questions:\n{\"questions\": [{\"question\": \"Q\"}]}\nGood luck!";

        assert_eq!(
            unwrap_response(raw).unwrap(),
            json!({ "questions": [{ "question": "Q" }] })
        );
    }

    #[test]
    fn recovers_array_when_it_starts_first() {
        let raw = "以下が問題です。\n[{\"question\": \"A\"}, {\"question\": \"B\"}]\n以上";

        assert_eq!(
            unwrap_response(raw).unwrap(),
            json!([{ "question": "A" }, { "question": "B" }])
        );
    }

    #[test]
    fn recovers_block_followed_by_braces_in_prose() {
        let raw = "{\"questions\": []}\nNote: use {curly} braces carefully.";

        assert_eq!(unwrap_response(raw).unwrap(), json!({ "questions": [] }));
    }

    #[test]
    fn skips_unparseable_blocks_before_the_payload() {
        let raw = "Screen: 5\" wide, {oops} then {\"answer\": 1}";
        assert_eq!(unwrap_response(raw).unwrap(), json!({ "answer": 1 }));
    }

    #[test]
    fn recovers_block_inside_an_unclosed_bracket() {
        let raw = "{bad} [draft {\"questions\": []} [unfinished";
        assert_eq!(unwrap_response(raw).unwrap(), json!({ "questions": [] }));
    }

    #[test]
    fn long_run_of_unclosed_openers_fails_quickly() {
        let raw = "[".repeat(200_000);
        let started = std::time::Instant::now();

        let err = unwrap_response(&raw).unwrap_err();

        assert!(matches!(err, ExtractError::MalformedPayload { .. }));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn balanced_blocks_are_ordered_by_start() {
        let text = "x [1, {\"a\": \"}\"}] {2}";
        assert_eq!(balanced_blocks(text), vec![(2, 17), (6, 16), (18, 21)]);
    }

    #[test]
    fn empty_output_is_malformed() {
        assert!(matches!(
            unwrap_response("   \n"),
            Err(ExtractError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn prose_without_json_is_malformed() {
        let err = unwrap_response("I'm sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedPayload { .. }));
    }

    #[test]
    fn truncated_json_is_malformed() {
        let err = unwrap_response("```json\n{\"questions\": [{\"question\": \"Q\"\n```").unwrap_err();
        assert!(matches!(err, ExtractError::MalformedPayload { .. }));
    }

    #[test]
    fn scalars_are_returned_as_parsed() {
        assert_eq!(unwrap_response("42").unwrap(), json!(42));
        assert_eq!(unwrap_response("\"text\"").unwrap(), json!("text"));
    }
}
