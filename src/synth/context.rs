//! Resolved names for one model, checked before any fragment renders.

use std::collections::BTreeSet;

use argen_runtime::Validation;
use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use quote::format_ident;
use syn::{Ident, Type};

use super::helpers::singularize;
use crate::error::{SynthError, SynthResult};
use crate::extract::{Directive, DirectiveKind, ModelDescriptor};

/// Methods every model and relation gets regardless of its directives.
const RESERVED_METHODS: &[&str] = &[
    "all",
    "and",
    "build",
    "create",
    "decode",
    "delete",
    "delete_all",
    "destroy",
    "exists",
    "explain",
    "field_by_name",
    "find",
    "find_by",
    "first",
    "from_row",
    "group",
    "having",
    "is_new_record",
    "is_persistent",
    "is_valid",
    "last",
    "limit",
    "new_relation",
    "offset",
    "order",
    "persist",
    "query",
    "query_row",
    "save",
    "scope",
    "select",
    "statement",
    "update",
    "where",
];

#[derive(Debug, Clone)]
pub struct FieldContext {
    pub ident: Ident,
    pub ty: Type,
    /// Field name without the raw prefix; the key in errors and lookups.
    pub key: String,
    pub column: String,
    pub validation: Validation,
}

#[derive(Debug, Clone)]
pub struct DirectiveContext {
    pub directive: Directive,
    /// Accessor or scope method, e.g. `posts` for `has_many Posts`.
    pub method: Ident,
    /// Related model type, absent for scopes.
    pub target: Option<Ident>,
    /// `joins_<method>` on the relation, absent for scopes.
    pub joins: Option<Ident>,
    /// `build_<target>` on the model, for has-one and has-many.
    pub builder: Option<Ident>,
    /// The owner's foreign key field, for belongs-to.
    pub foreign_key: Option<Ident>,
}

impl DirectiveContext {
    pub fn kind(&self) -> DirectiveKind {
        self.directive.kind()
    }

    pub fn arg(&self) -> &str {
        self.directive.arg()
    }

    pub fn target_table(&self) -> Option<String> {
        self.target.as_ref().map(ToString::to_string)
    }

    fn methods(&self) -> impl Iterator<Item = String> + '_ {
        [Some(&self.method), self.joins.as_ref(), self.builder.as_ref()]
            .into_iter()
            .flatten()
            .map(ToString::to_string)
    }
}

/// A model with every generated name resolved.
#[derive(Debug, Clone)]
pub struct ModelContext<'d> {
    pub descriptor: &'d ModelDescriptor,
    pub ident: Ident,
    pub relation: Ident,
    pub params: Ident,
    pub scope_fn: Ident,
    pub scopes: Ident,
    pub table: String,
    /// The column other models use to point at this one.
    pub foreign_key: String,
    /// The field holding that column on child records.
    pub foreign_key_field: Ident,
    pub fields: Vec<FieldContext>,
    primary_key: usize,
    pub directives: Vec<DirectiveContext>,
}

impl<'d> ModelContext<'d> {
    pub fn new(descriptor: &'d ModelDescriptor) -> SynthResult<Self> {
        let model = descriptor.name.as_str();
        let ident = parse_ident(model, model)?;

        let fields = descriptor
            .fields
            .iter()
            .map(|field| {
                let ty = syn::parse_str::<Type>(&field.ty).map_err(|_| SynthError::InvalidType {
                    model: model.to_string(),
                    field: field.name.clone(),
                    ty: field.ty.clone(),
                })?;
                Ok(FieldContext {
                    ident: parse_ident(model, &field.name)?,
                    ty,
                    key: field.key().to_string(),
                    column: field.column().to_string(),
                    validation: field.tag.validation.clone(),
                })
            })
            .collect::<SynthResult<Vec<_>>>()?;

        let primary_key = descriptor
            .primary_key()
            .and_then(|pk| descriptor.fields.iter().position(|f| f.name == pk.name))
            .ok_or_else(|| SynthError::MissingPrimaryKey {
                model: model.to_string(),
            })?;

        let mut context = Self {
            descriptor,
            relation: format_ident!("{}Relation", ident),
            params: format_ident!("{}Params", ident),
            scope_fn: format_ident!("{}Scope", ident),
            scopes: format_ident!("{}_SCOPES", model.to_shouty_snake_case()),
            table: descriptor.table_name(),
            foreign_key: descriptor.foreign_key_column(),
            foreign_key_field: format_ident!("{}", descriptor.foreign_key_field()),
            ident,
            fields,
            primary_key,
            directives: Vec::new(),
        };
        context.directives = descriptor
            .directives()
            .into_iter()
            .map(|directive| context.resolve(directive))
            .collect::<SynthResult<Vec<_>>>()?;
        context.check_methods()?;
        Ok(context)
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn primary_key(&self) -> &FieldContext {
        &self.fields[self.primary_key]
    }

    /// Every field except the primary key, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &FieldContext> {
        self.fields
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.primary_key)
            .map(|(_, f)| f)
    }

    pub fn validated_fields(&self) -> impl Iterator<Item = &FieldContext> {
        self.fields.iter().filter(|f| !f.validation.is_empty())
    }

    fn resolve(&self, directive: Directive) -> SynthResult<DirectiveContext> {
        let model = self.name();
        let arg = directive.arg();
        let method_name = arg.to_snake_case();
        let method = parse_ident(model, &method_name)?;
        let joins = (directive.kind() != DirectiveKind::Scope)
            .then(|| format_ident!("joins_{}", method_name));

        let (target, builder, foreign_key) = match directive.kind() {
            DirectiveKind::Scope => (None, None, None),
            DirectiveKind::HasOne | DirectiveKind::HasMany => {
                let target = parse_ident(model, &singularize(arg).to_upper_camel_case())?;
                let builder = format_ident!("build_{}", target.to_string().to_snake_case());
                (Some(target), Some(builder), None)
            }
            DirectiveKind::BelongsTo => {
                let target = parse_ident(model, &arg.to_upper_camel_case())?;
                let key = format!("{method_name}_id");
                let field = self.fields.iter().find(|f| f.key == key).ok_or_else(|| {
                    SynthError::MissingForeignKey {
                        model: model.to_string(),
                        target: target.to_string(),
                        field: key.clone(),
                    }
                })?;
                (Some(target), None, Some(field.ident.clone()))
            }
        };

        Ok(DirectiveContext {
            directive,
            method,
            target,
            joins,
            builder,
            foreign_key,
        })
    }

    fn check_methods(&self) -> SynthResult<()> {
        let mut seen: BTreeSet<String> = RESERVED_METHODS.iter().map(ToString::to_string).collect();
        for directive in &self.directives {
            for method in directive.methods() {
                if !seen.insert(method.clone()) {
                    return Err(SynthError::DuplicateMethod {
                        model: self.name().to_string(),
                        method,
                    });
                }
            }
        }
        Ok(())
    }
}

fn parse_ident(model: &str, ident: &str) -> SynthResult<Ident> {
    syn::parse_str::<Ident>(ident).map_err(|_| SynthError::InvalidIdentifier {
        model: model.to_string(),
        ident: ident.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Field;
    use assert_matches::assert_matches;

    fn post(annotations: &[&str]) -> ModelDescriptor {
        ModelDescriptor {
            package: "models".into(),
            marker: "+AR".into(),
            annotations: annotations.iter().map(|a| a.to_string()).collect(),
            name: "Post".into(),
            fields: vec![
                Field::new("id", "i64"),
                Field::new("user_id", "i64"),
                Field::new("title", "String"),
            ],
        }
    }

    #[test]
    fn test_resolves_names() {
        let model = post(&["+AR", "+AR belongs_to User", "+AR has_many Comments", "+AR scope Recent"]);
        let context = ModelContext::new(&model).unwrap();
        assert_eq!(context.relation.to_string(), "PostRelation");
        assert_eq!(context.params.to_string(), "PostParams");
        assert_eq!(context.scopes.to_string(), "POST_SCOPES");
        assert_eq!(context.table, "Post");
        assert_eq!(context.foreign_key, "Post_id");
        assert_eq!(context.foreign_key_field, "post_id");
        assert_eq!(context.primary_key().key, "id");
        assert_eq!(context.attributes().count(), 2);

        let methods: Vec<_> = context.directives.iter().map(|d| d.method.to_string()).collect();
        assert_eq!(methods, ["user", "comments", "recent"]);
        assert_eq!(context.directives[0].foreign_key.as_ref().unwrap(), "user_id");
        assert_eq!(context.directives[1].target_table().as_deref(), Some("Comment"));
        assert_eq!(context.directives[1].builder.as_ref().unwrap(), "build_comment");
        assert!(context.directives[2].target.is_none());
    }

    #[test]
    fn test_contexts_are_debuggable() {
        let model = post(&["+AR", "+AR belongs_to User"]);
        let context = ModelContext::new(&model).unwrap();
        let rendered = format!("{context:?}");
        assert!(rendered.contains("PostRelation"));
        assert!(rendered.contains("user_id"));
    }

    #[test]
    fn test_missing_primary_key() {
        let mut model = post(&["+AR"]);
        model.fields.remove(0);
        assert_matches!(
            ModelContext::new(&model),
            Err(SynthError::MissingPrimaryKey { model }) if model == "Post"
        );
    }

    #[test]
    fn test_missing_foreign_key() {
        let model = post(&["+AR belongs_to Author"]);
        assert_matches!(
            ModelContext::new(&model),
            Err(SynthError::MissingForeignKey { field, .. }) if field == "author_id"
        );
    }

    #[test]
    fn test_method_collisions() {
        assert_matches!(
            ModelContext::new(&post(&["+AR scope First"])),
            Err(SynthError::DuplicateMethod { method, .. }) if method == "first"
        );
        assert_matches!(
            ModelContext::new(&post(&["+AR has_many Comments", "+AR has_one Comment"])),
            Err(SynthError::DuplicateMethod { method, .. }) if method == "build_comment"
        );
    }

    #[test]
    fn test_invalid_names() {
        assert_matches!(
            ModelContext::new(&post(&["+AR scope Self"])),
            Err(SynthError::InvalidIdentifier { ident, .. }) if ident == "self"
        );
        let mut model = post(&["+AR"]);
        model.fields[2].ty = "Vec<".into();
        assert_matches!(ModelContext::new(&model), Err(SynthError::InvalidType { .. }));
    }
}
