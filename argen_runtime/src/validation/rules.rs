//! Rule configuration records, one [`Validation`] per validated field.
//!
//! Message templates may contain `{count}` (the configured bound) and
//! `{value}` (the evaluated value's text form).

pub const PRESENCE_MESSAGE: &str = "can't be blank";
pub const FORMAT_MESSAGE: &str = "is invalid";
pub const MINIMUM_MESSAGE: &str = "is too short (minimum is {count} characters)";
pub const MAXIMUM_MESSAGE: &str = "is too long (maximum is {count} characters)";
pub const IS_MESSAGE: &str = "is the wrong length (should be {count} characters)";
pub const NUMERICALITY_MESSAGE: &str = "is not a number";
pub const ONLY_INTEGER_MESSAGE: &str = "must be an integer";
pub const GREATER_THAN_MESSAGE: &str = "must be greater than {count}";
pub const GREATER_THAN_OR_EQUAL_TO_MESSAGE: &str = "must be greater than or equal to {count}";
pub const EQUAL_TO_MESSAGE: &str = "must be equal to {count}";
pub const LESS_THAN_MESSAGE: &str = "must be less than {count}";
pub const LESS_THAN_OR_EQUAL_TO_MESSAGE: &str = "must be less than or equal to {count}";
pub const ODD_MESSAGE: &str = "must be odd";
pub const EVEN_MESSAGE: &str = "must be even";

/// The rule groups configured for one field. Absent groups are not evaluated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Validation {
    pub presence: Option<Presence>,
    pub format: Option<Format>,
    pub length: Option<Length>,
    pub numericality: Option<Numericality>,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = Some(presence);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_numericality(mut self, numericality: Numericality) -> Self {
        self.numericality = Some(numericality);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.presence.is_none()
            && self.format.is_none()
            && self.length.is_none()
            && self.numericality.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Presence {
    pub message: String,
}

impl Default for Presence {
    fn default() -> Self {
        Self {
            message: PRESENCE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    /// Regular expression the text must match somewhere.
    pub with: String,
    pub message: String,
}

impl Format {
    pub fn new(with: impl Into<String>) -> Self {
        Self {
            with: with.into(),
            message: FORMAT_MESSAGE.to_string(),
        }
    }
}

/// A length bound. A zero `number` leaves the bound unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound {
    pub number: usize,
    pub message: String,
}

impl Bound {
    pub fn new(number: usize, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
        }
    }

    pub fn is_set(&self) -> bool {
        self.number != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    pub minimum: Bound,
    pub maximum: Bound,
    pub is: Bound,
}

impl Default for Length {
    fn default() -> Self {
        Self {
            minimum: Bound::new(0, MINIMUM_MESSAGE),
            maximum: Bound::new(0, MAXIMUM_MESSAGE),
            is: Bound::new(0, IS_MESSAGE),
        }
    }
}

impl Length {
    pub fn with_minimum(mut self, number: usize) -> Self {
        self.minimum.number = number;
        self
    }

    pub fn with_maximum(mut self, number: usize) -> Self {
        self.maximum.number = number;
        self
    }

    pub fn with_is(mut self, number: usize) -> Self {
        self.is.number = number;
        self
    }
}

/// An on/off check with its failure message.
#[derive(Debug, Clone, PartialEq)]
pub struct Flag {
    pub enabled: bool,
    pub message: String,
}

impl Flag {
    pub fn off(message: impl Into<String>) -> Self {
        Self {
            enabled: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    pub number: i64,
    pub message: String,
}

impl Threshold {
    pub fn new(number: i64, message: impl Into<String>) -> Self {
        Self {
            number,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Numericality {
    pub only_integer: Flag,
    pub greater_than: Option<Threshold>,
    pub greater_than_or_equal_to: Option<Threshold>,
    pub equal_to: Option<Threshold>,
    pub less_than: Option<Threshold>,
    pub less_than_or_equal_to: Option<Threshold>,
    pub odd: Flag,
    /// Reported next to the odd message whenever the odd check fails.
    /// `even` has no switch of its own.
    pub even_message: String,
    /// Reported when the value is not numeric at all.
    pub message: String,
}

impl Default for Numericality {
    fn default() -> Self {
        Self {
            only_integer: Flag::off(ONLY_INTEGER_MESSAGE),
            greater_than: None,
            greater_than_or_equal_to: None,
            equal_to: None,
            less_than: None,
            less_than_or_equal_to: None,
            odd: Flag::off(ODD_MESSAGE),
            even_message: EVEN_MESSAGE.to_string(),
            message: NUMERICALITY_MESSAGE.to_string(),
        }
    }
}

impl Numericality {
    pub fn only_integer(mut self) -> Self {
        self.only_integer.enabled = true;
        self
    }

    pub fn greater_than(mut self, number: i64) -> Self {
        self.greater_than = Some(Threshold::new(number, GREATER_THAN_MESSAGE));
        self
    }

    pub fn greater_than_or_equal_to(mut self, number: i64) -> Self {
        self.greater_than_or_equal_to =
            Some(Threshold::new(number, GREATER_THAN_OR_EQUAL_TO_MESSAGE));
        self
    }

    pub fn equal_to(mut self, number: i64) -> Self {
        self.equal_to = Some(Threshold::new(number, EQUAL_TO_MESSAGE));
        self
    }

    pub fn less_than(mut self, number: i64) -> Self {
        self.less_than = Some(Threshold::new(number, LESS_THAN_MESSAGE));
        self
    }

    pub fn less_than_or_equal_to(mut self, number: i64) -> Self {
        self.less_than_or_equal_to = Some(Threshold::new(number, LESS_THAN_OR_EQUAL_TO_MESSAGE));
        self
    }

    pub fn odd(mut self) -> Self {
        self.odd.enabled = true;
        self
    }
}
