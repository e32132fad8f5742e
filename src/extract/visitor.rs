use log::debug;
use syn::visit::Visit;
use syn::{Attribute, Expr, ExprLit, Fields, Item, ItemStruct, Lit, Meta, Type};
use thiserror::Error;

use super::model::{Field, ModelDescriptor};
use super::tag::FieldTag;

/// Why an annotated declaration did not become a model.
#[derive(Error, Debug)]
enum Skip {
    #[error("it has generic parameters")]
    Generic,
    #[error("it is not a struct with named fields")]
    NotNamedFields,
    #[error("field `{0}` does not have a plain type name")]
    FieldType(String),
    #[error("field `{field}` has a malformed tag: {source}")]
    Tag {
        field: String,
        #[source]
        source: syn::Error,
    },
}

/// Collects annotated top-level structs of one file.
///
/// Only the items directly in the file are inspected. Nested modules and
/// items inside function bodies are never visited.
pub struct ModelVisitor<'m> {
    package: &'m str,
    marker: &'m str,
    pub models: Vec<ModelDescriptor>,
}

impl<'m> ModelVisitor<'m> {
    pub fn new(package: &'m str, marker: &'m str) -> Self {
        Self {
            package,
            marker,
            models: Vec::new(),
        }
    }

    /// Marker lines of the item's doc comment, trimmed, in source order.
    fn annotations(&self, attrs: &[Attribute]) -> Vec<String> {
        attrs
            .iter()
            .filter_map(doc_text)
            .flat_map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| line.starts_with(self.marker))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn describe(&self, item: &ItemStruct, annotations: Vec<String>) -> Result<ModelDescriptor, Skip> {
        if !item.generics.params.is_empty() {
            return Err(Skip::Generic);
        }
        let Fields::Named(named) = &item.fields else {
            return Err(Skip::NotNamedFields);
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let Some(ident) = &field.ident else {
                return Err(Skip::NotNamedFields);
            };
            let name = ident.to_string();
            let ty = type_name(&field.ty).ok_or_else(|| Skip::FieldType(name.clone()))?;
            let tag = FieldTag::from_attributes(&field.attrs).map_err(|source| Skip::Tag {
                field: name.clone(),
                source,
            })?;
            fields.push(Field::new(name, ty).with_tag(tag));
        }

        Ok(ModelDescriptor {
            package: self.package.to_string(),
            marker: self.marker.to_string(),
            annotations,
            name: item.ident.to_string(),
            fields,
        })
    }
}

impl<'ast> Visit<'ast> for ModelVisitor<'_> {
    fn visit_file(&mut self, file: &'ast syn::File) {
        for item in &file.items {
            if let Item::Struct(item_struct) = item {
                self.visit_item_struct(item_struct);
            }
        }
    }

    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        let annotations = self.annotations(&item.attrs);
        if annotations.is_empty() {
            return;
        }
        match self.describe(item, annotations) {
            Ok(model) => {
                debug!(
                    "Extracted model `{}` with {} field(s) and {} annotation(s)",
                    model.name,
                    model.fields.len(),
                    model.annotations.len()
                );
                self.models.push(model);
            }
            Err(reason) => debug!("Skipping `{}`: {reason}", item.ident),
        }
    }
}

fn doc_text(attr: &Attribute) -> Option<String> {
    if !attr.path().is_ident("doc") {
        return None;
    }
    match &attr.meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(text),
                ..
            }) => Some(text.value()),
            _ => None,
        },
        _ => None,
    }
}

/// The identifier of a plain single-segment type such as `i64` or `String`.
fn type_name(ty: &Type) -> Option<String> {
    let Type::Path(path) = ty else {
        return None;
    };
    if path.qself.is_some() || path.path.leading_colon.is_some() || path.path.segments.len() != 1 {
        return None;
    }
    let segment = path.path.segments.first()?;
    segment
        .arguments
        .is_none()
        .then(|| segment.ident.to_string())
}
