//! Rule evaluation through the public API.

use argen_runtime::validation::{
    EVEN_MESSAGE, IS_MESSAGE, Length, MINIMUM_MESSAGE, Numericality, ODD_MESSAGE,
    ONLY_INTEGER_MESSAGE, PRESENCE_MESSAGE, Presence,
};
use argen_runtime::{Errors, Validation, Validator, Value};
use proptest::prelude::*;

mod presence {
    use super::*;

    #[test]
    fn test_presence_round_trip() {
        let validator = Validator::new(Validation::new().with_presence(Presence::default()));

        for zero in [Value::from(""), Value::Int(0), Value::Null, Value::Bool(false)] {
            let (valid, messages) = validator.is_valid(&zero);
            assert!(!valid);
            assert_eq!(messages, vec![PRESENCE_MESSAGE]);
        }

        let (valid, messages) = validator.is_valid(&Value::from("alice"));
        assert!(valid);
        assert!(messages.is_empty());
    }
}

mod length {
    use super::*;

    fn exactly_five() -> Validator {
        Validator::new(Validation::new().with_length(Length::default().with_is(5)))
    }

    #[test]
    fn test_exact_length_boundary() {
        let validator = exactly_five();
        assert_eq!(validator.is_valid(&Value::from("abcde")), (true, vec![]));

        let expected = IS_MESSAGE.replace("{count}", "5");
        for text in ["abcd", "abcdef"] {
            let (valid, messages) = validator.is_valid(&Value::from(text));
            assert!(!valid);
            assert_eq!(messages, vec![expected.clone()]);
        }
    }

    #[test]
    fn test_single_bound_repeats_in_range_check() {
        let validator = Validator::new(Validation::new().with_length(Length::default().with_minimum(2)));
        let expected = MINIMUM_MESSAGE.replace("{count}", "2");
        assert_eq!(
            validator.is_valid(&Value::from("abc")),
            (false, vec![expected.clone(), expected])
        );
        assert_eq!(validator.is_valid(&Value::from("ab")), (true, vec![]));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        assert!(exactly_five().is_valid(&Value::from("héllo")).0);
    }

    proptest! {
        #[test]
        fn prop_exact_length_matches_char_count(text in "\\PC{0,12}") {
            let (valid, _) = exactly_five().is_valid(&Value::from(text.as_str()));
            prop_assert_eq!(valid, text.chars().count() == 5);
        }
    }
}

mod numericality {
    use super::*;

    fn integers_above_ten() -> Validator {
        Validator::new(
            Validation::new().with_numericality(Numericality::default().only_integer().greater_than(10)),
        )
    }

    #[test]
    fn test_float_stops_at_only_integer() {
        let (valid, messages) = integers_above_ten().is_valid(&Value::Float(1.5));
        assert!(!valid);
        assert_eq!(messages, vec![ONLY_INTEGER_MESSAGE]);
    }

    #[test]
    fn test_integer_reaches_comparisons() {
        let validator = integers_above_ten();
        assert_eq!(validator.is_valid(&Value::Int(11)), (true, vec![]));
        assert_eq!(
            validator.is_valid(&Value::Int(10)).1,
            vec!["must be greater than 10"]
        );
    }

    #[test]
    fn test_text_is_not_a_number() {
        let (valid, messages) = integers_above_ten().is_valid(&Value::from("12"));
        assert!(!valid);
        assert_eq!(messages, vec!["is not a number"]);
    }

    #[test]
    fn test_every_failing_check_reports() {
        let rule = Numericality::default().less_than(0).equal_to(3).odd();
        let (_, messages) = Validator::new(Validation::new().with_numericality(rule)).is_valid(&Value::Int(4));
        assert_eq!(
            messages,
            vec![
                "must be equal to 3",
                "must be less than 0",
                "must be odd",
                "must be even",
            ]
        );
    }

    #[test]
    fn test_parity_unchecked_without_odd() {
        let validator = Validator::new(Validation::new().with_numericality(Numericality::default()));
        assert_eq!(validator.is_valid(&Value::Int(3)), (true, vec![]));
    }

    proptest! {
        #[test]
        fn prop_odd_failure_carries_even_message(n in any::<i64>()) {
            let odd = Validator::new(Validation::new().with_numericality(Numericality::default().odd()));
            let (valid, messages) = odd.is_valid(&Value::Int(n));
            prop_assert_eq!(valid, n % 2 != 0);
            if valid {
                prop_assert!(messages.is_empty());
            } else {
                prop_assert_eq!(messages, vec![ODD_MESSAGE, EVEN_MESSAGE]);
            }
        }
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_errors_collect_per_field() {
        let name = Validator::new(
            Validation::new()
                .with_presence(Presence::default())
                .with_length(Length::default().with_is(3)),
        );
        let mut errors = Errors::new();
        errors.merge_field("name", name.is_valid(&Value::from("")).1);
        errors.merge_field("email", Vec::new());

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").len(), 2);
        assert!(errors.get("email").is_empty());
        assert_eq!(
            errors.to_string(),
            "name can't be blank; name is the wrong length (should be 3 characters)"
        );
    }
}
