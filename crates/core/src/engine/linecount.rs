//! Line-count enforcement: a translated cue must keep the same number of
//! visible lines as its source, since subtitle renderers position cues
//! by line count as much as by duration.

const SEARCH_WINDOW: usize = 15;

/// Force `translated` to exactly `target_lines` lines.
///
/// - Already matching: returned unchanged.
/// - Too many lines: lines are grouped into `target_lines` contiguous,
///   evenly-sized runs and each run is joined with spaces.
/// - Too few lines (including the common single-line LLM reply): all
///   lines are joined with spaces, then re-split at the space nearest to
///   each of `target_lines` equal-width targets, within a
///   `SEARCH_WINDOW`-character window either side; any remainder is
///   dumped on the last line.
pub fn enforce_line_count(target_lines: usize, translated: &str) -> String {
    if target_lines == 0 {
        return translated.to_string();
    }

    let lines: Vec<&str> = translated.lines().collect();
    let lines = if lines.is_empty() { vec![translated] } else { lines };

    match lines.len().cmp(&target_lines) {
        std::cmp::Ordering::Equal => translated.to_string(),
        std::cmp::Ordering::Greater => collapse(&lines, target_lines),
        std::cmp::Ordering::Less => expand(&lines, target_lines),
    }
}

fn collapse(lines: &[&str], target_lines: usize) -> String {
    let total = lines.len();
    let mut groups: Vec<Vec<&str>> = Vec::with_capacity(target_lines);
    let base = total / target_lines;
    let remainder = total % target_lines;
    let mut idx = 0;
    for g in 0..target_lines {
        let take = base + if g < remainder { 1 } else { 0 };
        groups.push(lines[idx..idx + take].to_vec());
        idx += take;
    }
    groups
        .into_iter()
        .map(|g| g.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn expand(lines: &[&str], target_lines: usize) -> String {
    let joined = lines.join(" ");
    if joined.is_empty() {
        return std::iter::repeat(String::new())
            .take(target_lines)
            .collect::<Vec<_>>()
            .join("\n");
    }

    let chars: Vec<char> = joined.chars().collect();
    let total_len = chars.len();
    let target_width = total_len as f64 / target_lines as f64;

    let mut split_points = Vec::new();
    for i in 1..target_lines {
        let ideal = (target_width * i as f64).round() as usize;
        split_points.push(nearest_space(&chars, ideal));
    }
    split_points.sort_unstable();
    split_points.dedup();

    let mut out_lines = Vec::with_capacity(target_lines);
    let mut start = 0;
    for &point in &split_points {
        let point = point.clamp(start, total_len);
        out_lines.push(chars[start..point].iter().collect::<String>().trim().to_string());
        start = point;
    }
    out_lines.push(chars[start..].iter().collect::<String>().trim().to_string());

    // Fill any target lines that the split collapsed away (e.g. very
    // short text) so the caller still gets exactly `target_lines` lines.
    while out_lines.len() < target_lines {
        out_lines.push(String::new());
    }

    out_lines.join("\n")
}

/// Nearest space character to `ideal`, searched within `SEARCH_WINDOW`
/// chars either side; falls back to `ideal` itself (a hard cut) if none
/// is found.
fn nearest_space(chars: &[char], ideal: usize) -> usize {
    let lo = ideal.saturating_sub(SEARCH_WINDOW);
    let hi = (ideal + SEARCH_WINDOW).min(chars.len());

    let mut best: Option<(usize, usize)> = None;
    for i in lo..hi {
        if chars[i] == ' ' {
            let distance = ideal.abs_diff(i);
            if best.map(|(_, d)| distance < d).unwrap_or(true) {
                best = Some((i, distance));
            }
        }
    }
    best.map(|(i, _)| i).unwrap_or(ideal.min(chars.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_line_count_is_unchanged() {
        assert_eq!(enforce_line_count(2, "line1\nline2"), "line1\nline2");
    }

    #[test]
    fn collapses_extra_lines() {
        let result = enforce_line_count(1, "one\ntwo\nthree");
        assert_eq!(result.lines().count(), 1);
        assert_eq!(result, "one two three");
    }

    #[test]
    fn collapses_four_lines_into_two() {
        let result = enforce_line_count(2, "a\nb\nc\nd");
        assert_eq!(result.split('\n').count(), 2);
    }

    #[test]
    fn expands_single_line_into_two() {
        let result = enforce_line_count(2, "Bonjour cher ami");
        assert_eq!(result.split('\n').count(), 2);
    }

    #[test]
    fn expands_handles_short_text() {
        let result = enforce_line_count(3, "hi");
        assert_eq!(result.split('\n').count(), 3);
    }
}
