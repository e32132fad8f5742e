use std::collections::BTreeMap;
use std::fmt;

/// Validation messages accumulated per field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Errors {
    messages: BTreeMap<String, Vec<String>>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.messages
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Appends all `messages` to `field`, keeping their order. An empty list
    /// leaves the accumulator untouched.
    pub fn merge_field<I>(&mut self, field: &str, messages: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut messages = messages.into_iter().peekable();
        if messages.peek().is_none() {
            return;
        }
        self.messages
            .entry(field.to_string())
            .or_default()
            .extend(messages);
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn messages(&self) -> &BTreeMap<String, Vec<String>> {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .iter()
            .flat_map(|(field, msgs)| msgs.iter().map(move |m| (field.as_str(), m.as_str())))
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.iter().map(|(field, msg)| format!("{field} {msg}")).collect();
        f.write_str(&lines.join("; "))
    }
}

impl std::error::Error for Errors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_field_with_nothing_adds_no_field() {
        let mut errors = Errors::new();
        errors.merge_field("name", Vec::new());
        assert!(errors.is_empty());
        assert!(errors.get("name").is_empty());
    }

    #[test]
    fn test_messages_keep_order() {
        let mut errors = Errors::new();
        errors.add("name", "can't be blank");
        errors.merge_field("name", vec!["is invalid".to_string()]);
        errors.add("age", "is not a number");
        assert_eq!(errors.get("name"), ["can't be blank", "is invalid"]);
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.to_string(),
            "age is not a number; name can't be blank; name is invalid"
        );
    }
}
