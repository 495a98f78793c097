//! Greedy word wrap shared by layout (to measure) and paint (to draw).
//!
//! Widths are counted in code points: every `char` occupies one cell.

/// Wrap `text` into lines no wider than `width` cells.
///
/// - Embedded `\n` are hard breaks.
/// - The leading run of spaces/tabs of each source line is kept and
///   repeated on that line's continuation lines.
/// - Words are joined with a single space and never split, so a word
///   longer than `width` produces an over-long line.
/// - Empty text yields one empty line; `width <= 0` yields no lines.
pub fn wrap(text: &str, width: i32) -> Vec<String> {
    if width <= 0 {
        return Vec::new();
    }
    let max = usize::try_from(width).unwrap_or(usize::MAX);

    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let body = raw.trim_start_matches([' ', '\t']);
        let leading = &raw[..raw.len() - body.len()];
        let leading_len = leading.chars().count();

        let mut words = body.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(leading.to_string());
            continue;
        };

        let mut line = format!("{leading}{first}");
        let mut line_len = leading_len + first.chars().count();
        for word in words {
            let word_len = word.chars().count();
            if line_len + 1 + word_len <= max {
                line.push(' ');
                line.push_str(word);
                line_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(leading);
                line.push_str(word);
                line_len = leading_len + word_len;
            }
        }
        lines.push(line);
    }
    lines
}

/// Width in cells of the widest line.
pub fn widest(lines: &[String]) -> i32 {
    lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .map_or(0, |w| i32::try_from(w).unwrap_or(i32::MAX))
}
