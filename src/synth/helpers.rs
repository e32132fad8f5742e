//! Naming helpers shared by the fragments.

use heck::{ToSnakeCase, ToUpperCamelCase};
use inflector::string::{pluralize::to_plural, singularize::to_singular};

/// Uppercases the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// English singular of `word`. A capitalized word stays in upper camel
/// case, so `BlogPosts` becomes `BlogPost`.
pub fn singularize(word: &str) -> String {
    inflect(word, to_singular)
}

pub fn pluralize(word: &str) -> String {
    inflect(word, to_plural)
}

fn inflect(word: &str, rule: fn(&str) -> String) -> String {
    let inflected = rule(&word.to_snake_case());
    if word.starts_with(char::is_uppercase) {
        inflected.to_upper_camel_case()
    } else {
        inflected
    }
}

/// `"id", "name"`
pub fn join_column<S: AsRef<str>>(columns: &[S]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `row.id, row.name`, given names that already carry their prefix.
pub fn join_field<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ")
}
