/// Lines kept on each side of a match.
pub const DEFAULT_CONTEXT_LINES: usize = 2;

/// Snippet of `lines` around the 1-based line `line_number`, clipped to the
/// file bounds and joined with `\n`.
pub fn extract_context(lines: &[&str], line_number: usize, radius: usize) -> String {
    let start = line_number.saturating_sub(radius + 1);
    let end = lines.len().min(line_number.saturating_add(radius));
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n")
}
