//! Answer-encoding resolution
//!
//! Models mark the correct option as an index, a letter, a numeric string or
//! by repeating the option text. Each encoding has one resolver; the first
//! resolver that recognises the value decides it.

use serde::Serialize;
use serde_json::Value;

/// Which rule produced the final answer index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Index,
    Letter,
    DigitString,
    OptionText,
    /// Nothing usable, or the resolved index was out of range. The answer is 0.
    Defaulted,
}

type Resolver = fn(&Value, &[String]) -> Option<i64>;

const RESOLVERS: &[(AnswerSource, Resolver)] = &[
    (AnswerSource::Index, from_number),
    (AnswerSource::Letter, from_letter),
    (AnswerSource::DigitString, from_digit_string),
    (AnswerSource::OptionText, from_option_text),
];

/// Resolves `answer` against `options`, falling back to index 0.
pub fn resolve_answer(answer: Option<&Value>, options: &[String]) -> (usize, AnswerSource) {
    let Some(answer) = answer else {
        return (0, AnswerSource::Defaulted);
    };

    RESOLVERS
        .iter()
        .find_map(|(source, resolve)| resolve(answer, options).map(|index| (index, *source)))
        .and_then(|(index, source)| {
            usize::try_from(index)
                .ok()
                .filter(|index| *index < options.len())
                .map(|index| (index, source))
        })
        .unwrap_or((0, AnswerSource::Defaulted))
}

/// A JSON number with an integral value.
fn from_number(answer: &Value, _options: &[String]) -> Option<i64> {
    let Value::Number(number) = answer else {
        return None;
    };
    if let Some(index) = number.as_i64() {
        return Some(index);
    }
    // u64 beyond i64 or a float; only whole floats count.
    let float = number.as_f64()?;
    (float.is_finite() && float.fract() == 0.0 && float.abs() < i64::MAX as f64)
        .then_some(float as i64)
}

/// A single letter: `A`/`a` → 0, `B`/`b` → 1, …
fn from_letter(answer: &Value, _options: &[String]) -> Option<i64> {
    let mut chars = answer.as_str()?.trim().chars();
    let letter = chars.next().filter(char::is_ascii_alphabetic)?;
    if chars.next().is_some() {
        return None;
    }
    Some(i64::from(letter.to_ascii_uppercase() as u8 - b'A'))
}

/// A string made only of ASCII digits.
fn from_digit_string(answer: &Value, _options: &[String]) -> Option<i64> {
    let digits = answer.as_str()?.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The literal text of one of the options (trimmed, case-sensitive).
fn from_option_text(answer: &Value, options: &[String]) -> Option<i64> {
    let text = answer.as_str()?.trim();
    let position = options.iter().position(|option| option.trim() == text)?;
    i64::try_from(position).ok()
}
