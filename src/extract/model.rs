//! Descriptors produced by the extractor.

use derive_more::{Deref, From, IntoIterator};
use heck::ToSnakeCase;

use super::directive::Directive;
use super::tag::FieldTag;

/// One named field of a model, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The identifier as written, including any `r#` prefix.
    pub name: String,
    /// The single-segment type name, e.g. `i64` or `String`.
    pub ty: String,
    pub tag: FieldTag,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tag: FieldTag::default(),
        }
    }

    pub fn with_tag(mut self, tag: FieldTag) -> Self {
        self.tag = tag;
        self
    }

    /// The field name without a raw identifier prefix.
    pub fn key(&self) -> &str {
        self.name.strip_prefix("r#").unwrap_or(&self.name)
    }

    /// The column the field maps to: the tagged column or the field key.
    pub fn column(&self) -> &str {
        self.tag.column.as_deref().unwrap_or_else(|| self.key())
    }
}

/// Everything the synthesizer needs to know about one annotated struct.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    pub package: String,
    pub marker: String,
    /// Every marker line of the doc comment, trimmed, in source order.
    pub annotations: Vec<String>,
    pub name: String,
    pub fields: Vec<Field>,
}

impl ModelDescriptor {
    /// Directives classified from the annotations, in annotation order.
    /// Lines that are not directives (such as the bare marker) are left out.
    pub fn directives(&self) -> Vec<Directive> {
        self.annotations
            .iter()
            .filter_map(|line| Directive::parse(line, &self.marker))
            .collect()
    }

    pub fn field_names(&self, prefix: &str) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| format!("{prefix}{}", f.name))
            .collect()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.column().to_string()).collect()
    }

    /// The first field tagged `primary_key`, otherwise the field named `id`.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.tag.primary_key)
            .or_else(|| self.fields.iter().find(|f| f.key() == "id"))
    }

    /// Tables are named after the capitalized model name.
    pub fn table_name(&self) -> String {
        crate::synth::helpers::capitalize(&self.name)
    }

    /// The column other tables use to point at this model, derived from the
    /// table name.
    pub fn foreign_key_column(&self) -> String {
        format!("{}_id", self.table_name())
    }

    /// The field a child record stores that column in.
    pub fn foreign_key_field(&self) -> String {
        format!("{}_id", self.name.to_snake_case())
    }
}

/// The ordered result of one extraction run.
#[derive(Debug, Clone, PartialEq, Default, Deref, From, IntoIterator)]
pub struct Models(Vec<ModelDescriptor>);

impl Models {
    pub fn new(models: Vec<ModelDescriptor>) -> Self {
        Self(models)
    }

    /// The package shared by the models, or `""` when there are none.
    pub fn package(&self) -> &str {
        self.0.first().map(|m| m.package.as_str()).unwrap_or("")
    }
}

impl<'a> IntoIterator for &'a Models {
    type Item = &'a ModelDescriptor;
    type IntoIter = std::slice::Iter<'a, ModelDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
