//! Read/write classification of ad-hoc SQL text, and identifier
//! validation for the one statement family that cannot be parameterized.

use std::sync::OnceLock;

use regex::Regex;

/// Classification of a query prior to execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Read,
    Write,
}

/// First tokens of statements that never modify the database.
const READ_KEYWORDS: [&str; 4] = ["SELECT", "PRAGMA", "EXPLAIN", "WITH"];

/// Classify SQL text as read-only or mutating.
///
/// Leading semicolons, whitespace, `--` line comments, and `/* */` block
/// comments are stripped in a loop until none remain, so `;;;SELECT 1`
/// and `/* hidden */ DELETE FROM t` both classify by their first real
/// token. Text with nothing left after stripping classifies as a read:
/// it cannot mutate anything. An unterminated block comment swallows the
/// rest of the input.
///
/// `WITH` counts as a read prefix even though a CTE can wrap a
/// data-modifying statement; bodies are not inspected.
pub fn classify(sql: &str) -> QueryKind {
    let mut rest = sql;
    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_whitespace());
        if let Some(after) = rest.strip_prefix("--") {
            rest = after.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            break;
        }
    }

    let Some(first) = rest.split_whitespace().next() else {
        return QueryKind::Read;
    };
    let first = first.to_ascii_uppercase();
    if READ_KEYWORDS.contains(&first.as_str()) {
        QueryKind::Read
    } else {
        QueryKind::Write
    }
}

static IDENTIFIER: OnceLock<Regex> = OnceLock::new();

/// Whether `name` is safe to embed in statements that take no bind
/// parameters, such as `PRAGMA table_info(<name>)`.
///
/// Anything failing this check must never be concatenated into SQL.
pub fn validate_identifier(name: &str) -> bool {
    let pattern = IDENTIFIER
        .get_or_init(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern compiles"));
    pattern.is_match(name)
}
