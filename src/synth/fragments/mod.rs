//! The named fragment library.
//!
//! Each fragment renders one generated capability for one model as a token
//! stream. Rendering parses the tokens back into items, so a fragment that
//! emits invalid Rust fails the whole run instead of producing a broken file.

mod associations;
mod finders;
mod persistence;
mod validation;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use log::trace;
use proc_macro2::TokenStream;

use super::context::{DirectiveContext, ModelContext};
use crate::error::{SynthError, SynthResult};

pub use validation::validation_tokens;

/// What a fragment renders against: one model, plus the directive for
/// fragments expanded once per directive.
#[derive(Debug, Clone, Copy)]
pub struct Expansion<'a, 'd> {
    pub fragment: &'static str,
    pub model: &'a ModelContext<'d>,
    pub directive: Option<&'a DirectiveContext>,
}

impl<'a> Expansion<'a, '_> {
    /// The directive this fragment was expanded for.
    pub fn directive(&self) -> SynthResult<&'a DirectiveContext> {
        self.directive.ok_or_else(|| SynthError::MissingArgument {
            fragment: self.fragment.to_string(),
        })
    }
}

pub type FragmentFn = fn(&Expansion<'_, '_>) -> SynthResult<TokenStream>;

static STANDARD: LazyLock<FragmentLibrary> = LazyLock::new(FragmentLibrary::build_standard);

#[derive(Debug, Clone, Default)]
pub struct FragmentLibrary {
    fragments: BTreeMap<&'static str, FragmentFn>,
}

impl FragmentLibrary {
    /// The library every generated file is built from.
    pub fn standard() -> &'static FragmentLibrary {
        &STANDARD
    }

    pub fn empty() -> Self {
        Self::default()
    }

    fn build_standard() -> Self {
        let mut library = Self::empty();
        library
            .insert("Relation", finders::relation)
            .insert("Select", finders::select)
            .insert("Find", finders::find)
            .insert("FindBy", finders::find_by)
            .insert("First", finders::first)
            .insert("Last", finders::last)
            .insert("Where", finders::r#where)
            .insert("And", finders::and)
            .insert("Order", finders::order)
            .insert("Limit", finders::limit)
            .insert("Offset", finders::offset)
            .insert("Group", finders::group)
            .insert("Having", finders::having)
            .insert("Explain", finders::explain)
            .insert("Query", finders::query)
            .insert("QueryRow", finders::query_row)
            .insert("Exists", finders::exists)
            .insert("Validation", validation::validation)
            .insert("Scope", associations::scope)
            .insert("HasMany", associations::has_many)
            .insert("HasOne", associations::has_one)
            .insert("BelongsTo", associations::belongs_to)
            .insert("JoinsHasAny", associations::joins_has_any)
            .insert("JoinsBelongsTo", associations::joins_belongs_to)
            .insert("BuildHasAny", associations::build_has_any)
            .insert("Build", persistence::build)
            .insert("Create", persistence::create)
            .insert("Save", persistence::save)
            .insert("Update", persistence::update)
            .insert("Delete", persistence::delete)
            .insert("Destroy", persistence::destroy)
            .insert("FieldByName", persistence::field_by_name);
        library
    }

    pub fn insert(&mut self, name: &'static str, fragment: FragmentFn) -> &mut Self {
        self.fragments.insert(name, fragment);
        self
    }

    pub fn get(&self, name: &str) -> SynthResult<FragmentFn> {
        self.fragments
            .get(name)
            .copied()
            .ok_or_else(|| SynthError::UnknownFragment(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fragments.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fragments.keys().copied()
    }

    /// Renders fragment `name` and parses the result into items.
    pub fn render(
        &self,
        name: &'static str,
        model: &ModelContext<'_>,
        directive: Option<&DirectiveContext>,
    ) -> SynthResult<Vec<syn::Item>> {
        let fragment = self.get(name)?;
        trace!("Rendering fragment `{name}` for `{}`", model.name());
        let expansion = Expansion {
            fragment: name,
            model,
            directive,
        };
        let tokens = fragment(&expansion)?;
        let file = syn::parse2::<syn::File>(tokens).map_err(|source| SynthError::MalformedFragment {
            fragment: name.to_string(),
            model: model.name().to_string(),
            source,
        })?;
        Ok(file.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{Field, ModelDescriptor};
    use assert_matches::assert_matches;
    use quote::quote;

    fn descriptor() -> ModelDescriptor {
        ModelDescriptor {
            package: "models".into(),
            marker: "+AR".into(),
            annotations: vec!["+AR scope Recent".into()],
            name: "User".into(),
            fields: vec![Field::new("id", "i64"), Field::new("name", "String")],
        }
    }

    fn broken(_: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
        Ok(quote!(impl User { fn }))
    }

    #[test]
    fn test_standard_library_names() {
        let library = FragmentLibrary::standard();
        for name in ["Relation", "Find", "Validation", "Scope", "JoinsHasAny", "FieldByName"] {
            assert!(library.contains(name), "missing {name}");
        }
        assert_eq!(library.names().count(), 32);
    }

    #[test]
    fn test_unknown_fragment() {
        let descriptor = descriptor();
        let model = ModelContext::new(&descriptor).unwrap();
        assert_matches!(
            FragmentLibrary::empty().render("Find", &model, None),
            Err(SynthError::UnknownFragment(name)) if name == "Find"
        );
    }

    #[test]
    fn test_malformed_fragment_is_fatal() {
        let descriptor = descriptor();
        let model = ModelContext::new(&descriptor).unwrap();
        let mut library = FragmentLibrary::empty();
        library.insert("Broken", broken);
        assert_matches!(
            library.render("Broken", &model, None),
            Err(SynthError::MalformedFragment { fragment, model, .. })
                if fragment == "Broken" && model == "User"
        );
    }

    #[test]
    fn test_directive_fragment_needs_a_directive() {
        let descriptor = descriptor();
        let model = ModelContext::new(&descriptor).unwrap();
        assert_matches!(
            FragmentLibrary::standard().render("Scope", &model, None),
            Err(SynthError::MissingArgument { fragment }) if fragment == "Scope"
        );
        let items = FragmentLibrary::standard()
            .render("Scope", &model, model.directives.first())
            .unwrap();
        assert!(!items.is_empty());
    }
}
