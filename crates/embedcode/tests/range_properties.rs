use embedcode::app::extract::{extract, line_count};
use embedcode::app::range::parse;
use embedcode::domain::model::LineSet;
use proptest::prelude::*;

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..500).prop_map(|line| line.to_string()),
        (1usize..500, 0usize..40, " {0,2}", " {0,2}")
            .prop_map(|(start, len, left, right)| format!("{start}{left}-{right}{}", start + len)),
    ]
}

fn tokens() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token(), 1..8)
}

proptest! {
    #[test]
    fn parse_is_idempotent_through_canonical_form(tokens in tokens()) {
        let spec = tokens.join(" , ");
        let lines = parse(&spec).unwrap();
        let reparsed = parse(&lines.to_string()).unwrap();
        prop_assert_eq!(&reparsed, &lines);
        prop_assert_eq!(reparsed.to_string(), lines.to_string());
    }

    #[test]
    fn token_order_does_not_matter(tokens in tokens()) {
        let forward = parse(&tokens.join(",")).unwrap();
        let mut reversed = tokens.clone();
        reversed.reverse();
        let backward = parse(&reversed.join(",")).unwrap();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn parsed_sets_are_sorted_positive_and_unique(tokens in tokens()) {
        let lines = parse(&tokens.join(",")).unwrap();
        prop_assert!(lines.as_slice().windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(lines.iter().all(|line| line >= 1));
    }

    #[test]
    fn empty_selection_is_identity(text in "[a-z \r\n]{0,60}") {
        prop_assert_eq!(extract(&text, &LineSet::default()), text);
    }

    #[test]
    fn selecting_every_line_normalizes_endings(
        lines in prop::collection::vec("[a-z ]{0,12}", 1..12),
        crlf in any::<bool>(),
    ) {
        let text = lines.join(if crlf { "\r\n" } else { "\n" });
        let all = LineSet::from_indices(1..=line_count(&text));
        prop_assert_eq!(extract(&text, &all), lines.join("\n"));
    }

    #[test]
    fn out_of_range_indices_never_fail(text in "[a-z\n]{0,40}", extra in 1usize..100) {
        let beyond = LineSet::from_indices([line_count(&text) + extra]);
        prop_assert_eq!(extract(&text, &beyond), "");
    }
}

#[test]
fn equivalent_specs_share_a_line_set() {
    assert_eq!(parse("5,3-4,4").unwrap().as_slice(), &[3, 4, 5]);
    assert_eq!(parse("5,3-4,4").unwrap(), parse("3,4,5").unwrap());
}

#[test]
fn zero_and_inverted_specs_fail() {
    assert!(parse("0").is_err());
    assert!(parse("5-2").is_err());
}
