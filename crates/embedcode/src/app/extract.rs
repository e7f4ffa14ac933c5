//! Selecting lines out of a source buffer.

use crate::domain::model::LineSet;

/// Return the lines named by `lines`, joined with `\n`.
///
/// An empty set returns `text` untouched. Indices past the end of the text are skipped, so a
/// stale range against a shortened file degrades instead of failing.
pub fn extract(text: &str, lines: &LineSet) -> String {
    if lines.is_empty() {
        return text.to_owned();
    }

    let source: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    lines
        .iter()
        .filter_map(|line| source.get(line - 1).copied())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of physical lines `extract` sees in `text`.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::range::parse;

    #[test]
    fn empty_selection_returns_text_verbatim() {
        assert_eq!(extract("", &LineSet::default()), "");
        assert_eq!(extract("a\r\nb\n", &LineSet::default()), "a\r\nb\n");
    }

    #[test]
    fn selects_lines_in_ascending_order() {
        let text = "one\ntwo\nthree\nfour\nfive";
        assert_eq!(extract(text, &parse("4,1-2").unwrap()), "one\ntwo\nfour");
    }

    #[test]
    fn skips_out_of_range_indices() {
        assert_eq!(extract("a\nb\nc", &LineSet::from_indices([1, 5])), "a");
        assert_eq!(extract("a\nb\nc", &LineSet::from_indices([7, 9])), "");
    }

    #[test]
    fn strips_carriage_returns() {
        assert_eq!(
            extract("a\r\nb\r\nc\r\n", &LineSet::from_indices([2, 3])),
            "b\nc"
        );
    }

    #[test]
    fn selecting_every_line_round_trips() {
        let text = "fn main() {\r\n    run();\r\n}\r\n";
        let all = LineSet::from_indices(1..=line_count(text));
        assert_eq!(extract(text, &all), text.replace("\r\n", "\n"));
    }
}
