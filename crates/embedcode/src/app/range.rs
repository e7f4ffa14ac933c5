//! Parsing of compact line-range specifications such as `3,7-9,12`.

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::domain::errors::RangeSpecError;
use crate::domain::model::LineSet;

/// Highest line index a specification may name.
pub const MAX_LINE_INDEX: usize = 1 << 20;

/// Parse a range specification into its canonical [`LineSet`].
///
/// Tokens are comma separated and are either a single line (`7`) or an inclusive range
/// (`7-9`). Whitespace around tokens and around the hyphen is ignored. Overlapping or
/// out-of-order tokens are merged, so `5,3-4,4` and `3,4,5` produce the same set. A blank
/// specification yields an empty set, which selects every line.
pub fn parse(spec: &str) -> Result<LineSet, RangeSpecError> {
    if spec.trim().is_empty() {
        return Ok(LineSet::default());
    }

    let mut lines = BTreeSet::new();
    for token in spec.split(',') {
        let (start, end) = parse_token(token.trim())?;
        lines.extend(start..=end);
    }

    Ok(LineSet::from_indices(lines))
}

impl FromStr for LineSet {
    type Err = RangeSpecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse(value)
    }
}

fn parse_token(token: &str) -> Result<(usize, usize), RangeSpecError> {
    match token.split_once('-') {
        None => {
            let line = parse_line(token, token)?;
            Ok((line, line))
        }
        Some((start, end)) => {
            let start = parse_line(start.trim(), token)?;
            let end = parse_line(end.trim(), token)?;
            if end < start {
                return Err(RangeSpecError::Inverted { start, end });
            }
            Ok((start, end))
        }
    }
}

fn parse_line(value: &str, token: &str) -> Result<usize, RangeSpecError> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RangeSpecError::Malformed(token.to_owned()));
    }

    match value.parse::<usize>() {
        Ok(0) => Err(RangeSpecError::NonPositive(token.to_owned())),
        Ok(line) if line <= MAX_LINE_INDEX => Ok(line),
        _ => Err(RangeSpecError::TooLarge(value.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(spec: &str) -> Vec<usize> {
        parse(spec).unwrap().as_slice().to_vec()
    }

    #[test]
    fn parses_singles_and_ranges() {
        assert_eq!(lines("3,7-9,12"), vec![3, 7, 8, 9, 12]);
    }

    #[test]
    fn canonicalizes_order_and_duplicates() {
        assert_eq!(lines("5,3-4,4"), vec![3, 4, 5]);
        assert_eq!(parse("5,3-4,4").unwrap(), parse("3,4,5").unwrap());
    }

    #[test]
    fn trims_whitespace_around_tokens_and_hyphen() {
        assert_eq!(lines(" 2 ,  4 - 6 "), vec![2, 4, 5, 6]);
    }

    #[test]
    fn blank_spec_selects_everything() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   \t").unwrap().is_empty());
    }

    #[test]
    fn single_line_range_is_allowed() {
        assert_eq!(lines("4-4"), vec![4]);
    }

    #[test]
    fn rejects_zero() {
        assert_eq!(parse("0"), Err(RangeSpecError::NonPositive("0".into())));
        assert_eq!(parse("0-3"), Err(RangeSpecError::NonPositive("0-3".into())));
    }

    #[test]
    fn rejects_inverted_ranges() {
        assert_eq!(
            parse("5-2"),
            Err(RangeSpecError::Inverted { start: 5, end: 2 })
        );
    }

    #[test]
    fn rejects_malformed_tokens() {
        for spec in ["2-", "-2", "a", "1-2-3", "1,,2", "3,", "+4", "1.5", "-"] {
            assert!(
                matches!(parse(spec), Err(RangeSpecError::Malformed(_))),
                "expected '{spec}' to be malformed"
            );
        }
    }

    #[test]
    fn rejects_huge_indices() {
        assert_eq!(
            parse("1-99999999999"),
            Err(RangeSpecError::TooLarge("99999999999".into()))
        );
    }

    #[test]
    fn overflowing_index_reports_the_digits_written() {
        let err = parse("3-999999999999999999999999").unwrap_err();
        assert_eq!(
            err,
            RangeSpecError::TooLarge("999999999999999999999999".into())
        );
        assert_eq!(
            err.to_string(),
            format!("line 999999999999999999999999 exceeds the supported maximum of {MAX_LINE_INDEX}")
        );
    }

    #[test]
    fn from_str_matches_parse() {
        let set: LineSet = "1-3,7".parse().unwrap();
        assert_eq!(set.to_string(), "1-3,7");
    }
}
