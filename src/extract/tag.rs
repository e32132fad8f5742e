//! Parsing of `#[ar(...)]` field tags.
//!
//! ```ignore
//! #[ar(primary_key, column = "user_id")]
//! #[ar(presence, format(with = "^[a-z]+$"), length(maximum = 10))]
//! #[ar(numericality(only_integer, greater_than = 0, message = "is not a count"))]
//! ```

use argen_runtime::validation::{
    Bound, EQUAL_TO_MESSAGE, Format, GREATER_THAN_MESSAGE, GREATER_THAN_OR_EQUAL_TO_MESSAGE,
    LESS_THAN_MESSAGE, LESS_THAN_OR_EQUAL_TO_MESSAGE, Length, Numericality, Presence, Threshold,
    Validation,
};
use quote::ToTokens;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, LitInt, LitStr, Token};

pub const TAG_ATTRIBUTE: &str = "ar";

/// Metadata attached to a field through its tag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldTag {
    /// The tag as written, one entry per `#[ar(...)]` attribute.
    pub raw: Vec<String>,
    pub primary_key: bool,
    pub column: Option<String>,
    pub validation: Validation,
}

impl FieldTag {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Reads every `#[ar(...)]` attribute of a field. Other attributes are
    /// ignored.
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut tag = FieldTag::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(TAG_ATTRIBUTE)) {
            tag.raw.push(attr.meta.to_token_stream().to_string());
            attr.parse_nested_meta(|meta| tag.parse_entry(meta))?;
        }
        Ok(tag)
    }

    fn parse_entry(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("primary_key") {
            self.primary_key = true;
        } else if meta.path.is_ident("column") {
            self.column = Some(parse_str(&meta)?);
        } else if meta.path.is_ident("presence") {
            let mut presence = Presence::default();
            if has_list(&meta) {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("message") {
                        presence.message = parse_str(&inner)?;
                        Ok(())
                    } else {
                        Err(inner.error("unsupported presence option"))
                    }
                })?;
            }
            self.validation.presence = Some(presence);
        } else if meta.path.is_ident("format") {
            let mut format = Format::new("");
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("with") {
                    format.with = parse_str(&inner)?;
                } else if inner.path.is_ident("message") {
                    format.message = parse_str(&inner)?;
                } else {
                    return Err(inner.error("unsupported format option"));
                }
                Ok(())
            })?;
            self.validation.format = Some(format);
        } else if meta.path.is_ident("length") {
            let mut length = Length::default();
            meta.parse_nested_meta(|inner| parse_length(&mut length, inner))?;
            self.validation.length = Some(length);
        } else if meta.path.is_ident("numericality") {
            let mut numericality = Numericality::default();
            let mut messages = Vec::new();
            if has_list(&meta) {
                meta.parse_nested_meta(|inner| {
                    parse_numericality(&mut numericality, &mut messages, inner)
                })?;
            }
            apply_threshold_messages(&mut numericality, messages, &meta)?;
            self.validation.numericality = Some(numericality);
        } else {
            return Err(meta.error("unsupported ar attribute"));
        }
        Ok(())
    }
}

fn has_list(meta: &ParseNestedMeta<'_>) -> bool {
    meta.input.peek(syn::token::Paren)
}

fn parse_str(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    Ok(meta.value()?.parse::<LitStr>()?.value())
}

fn parse_usize(meta: &ParseNestedMeta<'_>) -> syn::Result<usize> {
    meta.value()?.parse::<LitInt>()?.base10_parse()
}

fn parse_i64(meta: &ParseNestedMeta<'_>) -> syn::Result<i64> {
    let input = meta.value()?;
    let negative = input.parse::<Option<Token![-]>>()?.is_some();
    let number: i64 = input.parse::<LitInt>()?.base10_parse()?;
    Ok(if negative { -number } else { number })
}

fn parse_length(length: &mut Length, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
    let bound: &mut Bound = if meta.path.is_ident("minimum") || meta.path.is_ident("minimum_message") {
        &mut length.minimum
    } else if meta.path.is_ident("maximum") || meta.path.is_ident("maximum_message") {
        &mut length.maximum
    } else if meta.path.is_ident("is") || meta.path.is_ident("is_message") {
        &mut length.is
    } else {
        return Err(meta.error("unsupported length option"));
    };
    let is_message = meta
        .path
        .get_ident()
        .is_some_and(|i| i.to_string().ends_with("_message"));
    if is_message {
        bound.message = parse_str(&meta)?;
    } else {
        bound.number = parse_usize(&meta)?;
    }
    Ok(())
}

fn threshold_slot<'n>(
    numericality: &'n mut Numericality,
    check: &str,
) -> Option<(&'n mut Option<Threshold>, &'static str)> {
    let slot = match check {
        "greater_than" => (&mut numericality.greater_than, GREATER_THAN_MESSAGE),
        "greater_than_or_equal_to" => (
            &mut numericality.greater_than_or_equal_to,
            GREATER_THAN_OR_EQUAL_TO_MESSAGE,
        ),
        "equal_to" => (&mut numericality.equal_to, EQUAL_TO_MESSAGE),
        "less_than" => (&mut numericality.less_than, LESS_THAN_MESSAGE),
        "less_than_or_equal_to" => (
            &mut numericality.less_than_or_equal_to,
            LESS_THAN_OR_EQUAL_TO_MESSAGE,
        ),
        _ => return None,
    };
    Some(slot)
}

fn parse_numericality(
    numericality: &mut Numericality,
    messages: &mut Vec<(String, String)>,
    meta: ParseNestedMeta<'_>,
) -> syn::Result<()> {
    let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
        return Err(meta.error("unsupported numericality option"));
    };
    match key.as_str() {
        "only_integer" => numericality.only_integer.enabled = true,
        "odd" => numericality.odd.enabled = true,
        "even" => return Err(meta.error("`even` is implied by `odd`, set `even_message` instead")),
        "message" => numericality.message = parse_str(&meta)?,
        "only_integer_message" => numericality.only_integer.message = parse_str(&meta)?,
        "odd_message" => numericality.odd.message = parse_str(&meta)?,
        "even_message" => numericality.even_message = parse_str(&meta)?,
        _ => {
            if let Some((slot, default)) = threshold_slot(numericality, &key) {
                *slot = Some(Threshold::new(parse_i64(&meta)?, default));
            } else if let Some(check) = key
                .strip_suffix("_message")
                .filter(|check| threshold_slot(numericality, check).is_some())
            {
                messages.push((check.to_string(), parse_str(&meta)?));
            } else {
                return Err(meta.error("unsupported numericality option"));
            }
        }
    }
    Ok(())
}

/// Applies `<check>_message` options once every threshold is known, so
/// option order inside the tag does not matter.
fn apply_threshold_messages(
    numericality: &mut Numericality,
    messages: Vec<(String, String)>,
    meta: &ParseNestedMeta<'_>,
) -> syn::Result<()> {
    for (check, text) in messages {
        match threshold_slot(numericality, &check) {
            Some((Some(threshold), _)) => threshold.message = text,
            _ => return Err(meta.error(format!("`{check}_message` given without `{check}`"))),
        }
    }
    Ok(())
}
