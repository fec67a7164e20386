//! Partitioning of the `data` array

use serde_json::Value;

use super::coerce;
use super::prime;

/// Result of classifying one request's `data`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub numbers: Vec<Value>,
    pub alphabets: Vec<Value>,
    pub highest_lowercase: Option<Value>,
    pub prime_found: bool,
}

/// Whether the string form of `value` is exactly one ASCII letter
pub fn is_alphabet(value: &Value) -> bool {
    let text = coerce::string_form(value);
    text.len() == 1 && text.as_bytes()[0].is_ascii_alphabetic()
}

/// Largest lowercase letter among `alphabets`
///
/// Elements compare by string form; on a tie the later element wins, as a
/// stable ascending sort followed by taking the last element would give.
pub fn highest_lowercase(alphabets: &[Value]) -> Option<Value> {
    alphabets
        .iter()
        .map(|value| (coerce::string_form(value), value))
        .filter(|(text, _)| text.as_str() >= "a" && text.as_str() <= "z")
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, value)| value.clone())
}

/// Split `data` into numbers and alphabets and derive the summary facts
pub fn classify(data: &[Value]) -> Classification {
    let numbers: Vec<Value> = data
        .iter()
        .filter(|item| coerce::is_numeric(item))
        .cloned()
        .collect();
    let alphabets: Vec<Value> = data.iter().filter(|item| is_alphabet(item)).cloned().collect();

    let highest_lowercase = highest_lowercase(&alphabets);
    let prime_found = prime::any_prime(&numbers);

    Classification {
        numbers,
        alphabets,
        highest_lowercase,
        prime_found,
    }
}
