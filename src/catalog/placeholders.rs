//! Qt `QString::arg` placeholder handling.

use std::collections::BTreeSet;

/// Returns the argument indices (`1..=99`) referenced by `%N` or `%LN` in `text`.
///
/// `%n` (numerus count) and a `%` not followed by a digit are not arguments.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<u32> {
    let mut found = BTreeSet::new();
    let mut rest = text;

    while let Some(percent) = rest.find('%') {
        rest = rest.get(percent + 1..).unwrap_or_default();
        let digits_start = usize::from(rest.starts_with('L'));
        let digits: String = rest
            .get(digits_start..)
            .unwrap_or_default()
            .chars()
            .take_while(char::is_ascii_digit)
            .take(2)
            .collect();

        if let Ok(index) = digits.parse::<u32>()
            && index > 0
        {
            found.insert(index);
        }
    }

    found
}

/// Formats a placeholder set as `%1, %2` for messages.
#[must_use]
pub fn describe(indices: &BTreeSet<u32>) -> String {
    indices.iter().map(|index| format!("%{index}")).collect::<Vec<_>>().join(", ")
}
