//! Lua source normalization.
//!
//! Blanks `--` line comments, `--[[ ... ]]` block comments and
//! `description = [[ ... ]]` documentation blocks. Every line break of the
//! input survives as `\n`, so a line number computed on the normalized text
//! points at the same line of the original file.

use once_cell::sync::Lazy;
use regex::Regex;

const BLOCK_OPEN: &str = "--[[";
const LONG_CLOSE: &str = "]]";
const LINE_COMMENT: &str = "--";

static DESCRIPTION_OPEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*description\s*=\s*\[\[").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Normal,
    InBlockComment,
}

/// Run both passes: comment stripping, then description-block stripping.
pub fn normalize(text: &str) -> String {
    strip_description_blocks(&strip_comments(text))
}

/// Split on `\r\n`, `\n` or a lone `\r`, the line breaks Lua itself
/// accepts. A final line break does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find(|c: char| c == '\r' || c == '\n') {
        lines.push(&rest[..pos]);
        let width = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[pos + width..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// Join rewritten lines with `\n`, keeping a final line break if `original`
/// had one.
fn rejoin<S: AsRef<str>>(lines: &[S], original: &str) -> String {
    let mut out = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    if original.ends_with(|c: char| c == '\r' || c == '\n') {
        out.push('\n');
    }
    out
}

/// Remove line and block comments, keeping the prefix of each line that
/// precedes a comment. A block comment left open blanks every later line.
pub fn strip_comments(text: &str) -> String {
    let (lines, _) = split_lines(text).into_iter().fold(
        (Vec::new(), CommentState::Normal),
        |(mut out, state), line| {
            let (kept, next) = strip_line(line, state);
            out.push(kept);
            (out, next)
        },
    );
    rejoin(&lines, text)
}

fn strip_line(line: &str, mut state: CommentState) -> (String, CommentState) {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while !rest.is_empty() {
        match state {
            CommentState::InBlockComment => match rest.find(LONG_CLOSE) {
                Some(end) => {
                    rest = &rest[end + LONG_CLOSE.len()..];
                    state = CommentState::Normal;
                }
                None => break,
            },
            CommentState::Normal => {
                if let Some(after) = rest.strip_prefix(BLOCK_OPEN) {
                    rest = after;
                    state = CommentState::InBlockComment;
                } else if rest.starts_with(LINE_COMMENT) {
                    break;
                } else {
                    let mut chars = rest.chars();
                    if let Some(ch) = chars.next() {
                        out.push(ch);
                    }
                    rest = chars.as_str();
                }
            }
        }
    }

    (out, state)
}

/// Blank `description = [[ ... ]]` regions. The region ends on the first line
/// (opener included) containing `]]`.
pub fn strip_description_blocks(text: &str) -> String {
    let mut in_description = false;
    let lines: Vec<&str> = split_lines(text)
        .into_iter()
        .map(|line| {
            if !in_description && DESCRIPTION_OPEN_RE.is_match(line) {
                in_description = !line.contains(LONG_CLOSE);
                ""
            } else if in_description {
                if line.contains(LONG_CLOSE) {
                    in_description = false;
                }
                ""
            } else {
                line
            }
        })
        .collect();
    rejoin(&lines, text)
}
