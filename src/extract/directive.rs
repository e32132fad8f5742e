use heck::ToSnakeCase;
use strum::{AsRefStr, Display, EnumString};

/// The relation or scope instruction a directive line carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DirectiveKind {
    BelongsTo,
    HasOne,
    HasMany,
    Scope,
}

/// A classified annotation line, e.g. `+AR has_many Posts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    BelongsTo(String),
    HasOne(String),
    HasMany(String),
    Scope(String),
}

impl Directive {
    pub fn new(kind: DirectiveKind, arg: impl Into<String>) -> Self {
        let arg = arg.into();
        match kind {
            DirectiveKind::BelongsTo => Directive::BelongsTo(arg),
            DirectiveKind::HasOne => Directive::HasOne(arg),
            DirectiveKind::HasMany => Directive::HasMany(arg),
            DirectiveKind::Scope => Directive::Scope(arg),
        }
    }

    /// Classifies one annotation line.
    ///
    /// The keyword following the marker is matched in snake case, so
    /// `has_many` and `HasMany` are the same directive. Everything after the
    /// keyword is the argument, kept as written. The bare marker line, an
    /// unknown keyword or a missing argument yield `None`.
    pub fn parse(annotation: &str, marker: &str) -> Option<Self> {
        let rest = annotation.trim().strip_prefix(marker)?.trim();
        let (keyword, arg) = rest.split_once(char::is_whitespace)?;
        let arg = arg.trim();
        if arg.is_empty() {
            return None;
        }
        let kind = keyword.to_snake_case().parse::<DirectiveKind>().ok()?;
        Some(Self::new(kind, arg))
    }

    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::BelongsTo(_) => DirectiveKind::BelongsTo,
            Directive::HasOne(_) => DirectiveKind::HasOne,
            Directive::HasMany(_) => DirectiveKind::HasMany,
            Directive::Scope(_) => DirectiveKind::Scope,
        }
    }

    pub fn arg(&self) -> &str {
        match self {
            Directive::BelongsTo(arg)
            | Directive::HasOne(arg)
            | Directive::HasMany(arg)
            | Directive::Scope(arg) => arg,
        }
    }
}
