//! Formatting contract for the customer-facing reply.
//!
//! The synthesized text must open with a greeting, close with the team
//! sign-off, and never expose the internal analysis section headers.

pub const GREETING: &str = "Dear Valued Customer,";
pub const SIGN_OFF: &str = "Best regards, Customer Support Team";

const INTERNAL_HEADERS: &[&str] = &[
    "INTENT CLASSIFICATION",
    "FAQ MATCH & ANSWER",
    "SENTIMENT & URGENCY ANALYSIS",
    "RECOMMENDED SOLUTION",
];

const GREETING_OPENERS: &[&str] = &[
    "dear",
    "hello",
    "hi",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Longest line still read as a salutation rather than a sentence.
const MAX_SALUTATION_WORDS: usize = 6;

/// Enforce the formatting contract on raw synthesized text.
///
/// Returns an empty string when nothing customer-facing is left.
pub fn finalize_reply(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");

    // An internal header hides its paragraph, up to a blank line or a salutation.
    let mut lines: Vec<&str> = Vec::new();
    let mut in_section = false;
    for line in normalized.lines().map(str::trim_end) {
        if is_internal_header(line) {
            in_section = true;
            continue;
        }
        if in_section && !line.trim().is_empty() && !is_greeting(line) {
            continue;
        }
        in_section = false;
        if is_markdown_heading(line) {
            continue;
        }
        lines.push(line);
    }

    trim_blank_edges(&mut lines);
    drop_preamble(&mut lines);
    if lines.is_empty() {
        return String::new();
    }

    // "Best regards," / "Customer Support Team" on two lines becomes one.
    let n = lines.len();
    if n >= 2
        && lines[n - 1].trim() == "Customer Support Team"
        && lines[n - 2].trim().trim_end_matches(',') == "Best regards"
    {
        lines.truncate(n - 2);
        trim_blank_edges(&mut lines);
        lines.push("");
        lines.push(SIGN_OFF);
    }

    let mut body = collapse_blank_runs(&lines);

    let first = lines.first().map(|l| l.trim()).unwrap_or_default();
    if !is_greeting(first) {
        body = format!("{}\n\n{}", GREETING, body);
    }

    let last = body.lines().last().map(str::trim).unwrap_or_default();
    if last != SIGN_OFF {
        body = format!("{}\n\n{}", body, SIGN_OFF);
    }

    body
}

/// Whether a line opens with a salutation word.
pub fn is_greeting(line: &str) -> bool {
    let lowered = line.trim().to_lowercase();
    GREETING_OPENERS.iter().any(|opener| {
        lowered
            .strip_prefix(opener)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

/// A short greeting line ending in a comma, like `Dear Valued Customer,`.
fn is_salutation(line: &str) -> bool {
    let line = line.trim();
    is_greeting(line)
        && line.ends_with(',')
        && line.split_whitespace().count() <= MAX_SALUTATION_WORDS
}

/// Remove a lead-in such as "Here is the reply:" sitting above the salutation.
///
/// Only a single paragraph ending in a colon counts as lead-in.
fn drop_preamble(lines: &mut Vec<&str>) {
    let Some(start) = lines.iter().position(|line| is_salutation(line)) else {
        return;
    };
    let preamble = &lines[..start];
    let Some(last_text) = preamble.iter().rev().find(|l| !l.trim().is_empty()) else {
        return;
    };

    let paragraphs = preamble
        .split(|l| l.trim().is_empty())
        .filter(|p| !p.is_empty())
        .count();
    if paragraphs == 1 && last_text.trim_end().ends_with(':') {
        lines.drain(..start);
    }
}

/// A line holding only an internal header, optionally in markdown and with a colon.
fn is_internal_header(line: &str) -> bool {
    let bare = line
        .trim()
        .trim_matches(|c: char| matches!(c, '#' | '*' | '_' | ':' | '=') || c.is_whitespace())
        .to_uppercase();
    INTERNAL_HEADERS.iter().any(|header| bare == *header)
}

fn is_markdown_heading(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn trim_blank_edges(lines: &mut Vec<&str>) {
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
}

/// Join lines, keeping at most one blank line in a row.
fn collapse_blank_runs(lines: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && out.last().is_some_and(|prev| prev.trim().is_empty()) {
            continue;
        }
        out.push(if blank { "" } else { line });
    }
    out.join("\n")
}
