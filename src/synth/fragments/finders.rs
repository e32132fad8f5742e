//! Relation type and read-side fragments.

use proc_macro2::TokenStream;
use quote::quote;

use super::Expansion;
use crate::error::SynthResult;
use crate::synth::helpers::join_column;

pub(super) fn relation(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let (ident, relation, scope_fn, scopes) =
        (&model.ident, &model.relation, &model.scope_fn, &model.scopes);
    let table = &model.table;
    let columns: Vec<&str> = model.fields.iter().map(|f| f.column.as_str()).collect();
    let arms = model.fields.iter().map(|f| {
        let column = &f.column;
        let field = &f.ident;
        quote!(#column => record.#field = row.get_or_default(index)?,)
    });
    let relation_doc = format!(" Chainable query over `{ident}` records.");
    let scope_doc = format!(" A named scope on `{ident}` queries.");
    let columns_doc = format!(" Columns in declaration order: {}.", join_column(&columns));

    Ok(quote! {
        #[doc = #relation_doc]
        #[derive(Debug, Clone)]
        pub struct #relation {
            statement: ::argen_runtime::query::Select,
        }

        #[doc = #scope_doc]
        pub type #scope_fn = ::argen_runtime::ScopeFn<#relation>;

        static #scopes: ::argen_runtime::ScopeRegistry<#relation> =
            ::argen_runtime::ScopeRegistry::new();

        impl #ident {
            pub const TABLE: &'static str = #table;

            #[doc = #columns_doc]
            pub const COLUMNS: &'static [&'static str] = &[#(#columns),*];

            /// Registers `scope` under `name` for every later scope call.
            pub fn scope(name: &str, scope: #scope_fn) {
                #scopes.register(name, scope);
            }

            fn new_relation() -> #relation {
                #relation {
                    statement: ::argen_runtime::query::Select::new(Self::TABLE)
                        .columns(Self::COLUMNS.iter().copied()),
                }
            }

            pub fn all() -> #relation {
                Self::new_relation()
            }

            fn from_row<S: AsRef<str>>(
                columns: &[S],
                row: &::argen_runtime::Row,
            ) -> ::argen_runtime::RuntimeResult<Self> {
                let mut record = Self::default();
                for (index, column) in columns.iter().enumerate() {
                    match column.as_ref() {
                        #(#arms)*
                        _ => {}
                    }
                }
                Ok(record)
            }
        }

        impl #relation {
            pub fn statement(&self) -> &::argen_runtime::query::Select {
                &self.statement
            }

            fn decode(&self, row: &::argen_runtime::Row) -> ::argen_runtime::RuntimeResult<#ident> {
                let columns = self.statement.selected_columns();
                if columns.is_empty() {
                    #ident::from_row(#ident::COLUMNS, row)
                } else {
                    #ident::from_row(columns, row)
                }
            }
        }
    })
}

pub(super) fn select(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn select(columns: &[&str]) -> #relation {
                Self::new_relation().select(columns)
            }
        }

        impl #relation {
            /// Narrows the selected columns. Unselected fields load as their
            /// default value.
            pub fn select(mut self, columns: &[&str]) -> Self {
                self.statement = self.statement.columns(columns.iter().copied());
                self
            }
        }
    })
}

pub(super) fn find(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let ident = &e.model.ident;
    let pk = e.model.primary_key();
    let (pk_field, pk_ty, pk_column) = (&pk.ident, &pk.ty, &pk.column);
    Ok(quote! {
        impl #ident {
            pub fn find(#pk_field: #pk_ty) -> ::argen_runtime::RuntimeResult<Self> {
                Self::new_relation()
                    .r#where(#pk_column, vec![::argen_runtime::Value::from(#pk_field)])
                    .query_row()
            }
        }
    })
}

pub(super) fn find_by(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let ident = &e.model.ident;
    Ok(quote! {
        impl #ident {
            pub fn find_by(
                cond: &str,
                args: Vec<::argen_runtime::Value>,
            ) -> ::argen_runtime::RuntimeResult<Self> {
                Self::new_relation().r#where(cond, args).query_row()
            }
        }
    })
}

fn ordered_one(e: &Expansion<'_, '_>, method: TokenStream, order: TokenStream) -> TokenStream {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    let pk_column = &e.model.primary_key().column;
    quote! {
        impl #ident {
            pub fn #method() -> ::argen_runtime::RuntimeResult<Self> {
                Self::new_relation().#method()
            }
        }

        impl #relation {
            pub fn #method(self) -> ::argen_runtime::RuntimeResult<#ident> {
                let relation = Self {
                    statement: self
                        .statement
                        .order_by(#pk_column, ::argen_runtime::query::Order::#order)
                        .limit(1),
                };
                relation.query_row()
            }
        }
    }
}

pub(super) fn first(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    Ok(ordered_one(e, quote!(first), quote!(Asc)))
}

pub(super) fn last(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    Ok(ordered_one(e, quote!(last), quote!(Desc)))
}

pub(super) fn r#where(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn r#where(cond: &str, args: Vec<::argen_runtime::Value>) -> #relation {
                Self::new_relation().r#where(cond, args)
            }
        }

        impl #relation {
            /// Adds a condition. A bare column name compares with `=` (or
            /// `IN` for several arguments); anything else is used as written.
            pub fn r#where(mut self, cond: &str, args: Vec<::argen_runtime::Value>) -> Self {
                self.statement = self.statement.r#where(cond, args);
                self
            }
        }
    })
}

pub(super) fn and(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let relation = &e.model.relation;
    Ok(quote! {
        impl #relation {
            pub fn and(mut self, cond: &str, args: Vec<::argen_runtime::Value>) -> Self {
                self.statement = self.statement.and(cond, args);
                self
            }
        }
    })
}

pub(super) fn order(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn order(column: &str, order: ::argen_runtime::query::Order) -> #relation {
                Self::new_relation().order(column, order)
            }
        }

        impl #relation {
            pub fn order(mut self, column: &str, order: ::argen_runtime::query::Order) -> Self {
                self.statement = self.statement.order_by(column, order);
                self
            }
        }
    })
}

fn paging(e: &Expansion<'_, '_>, method: TokenStream) -> TokenStream {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    quote! {
        impl #ident {
            pub fn #method(#method: u64) -> #relation {
                Self::new_relation().#method(#method)
            }
        }

        impl #relation {
            pub fn #method(mut self, #method: u64) -> Self {
                self.statement = self.statement.#method(#method);
                self
            }
        }
    }
}

pub(super) fn limit(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    Ok(paging(e, quote!(limit)))
}

pub(super) fn offset(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    Ok(paging(e, quote!(offset)))
}

pub(super) fn group(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn group(columns: &[&str]) -> #relation {
                Self::new_relation().group(columns)
            }
        }

        impl #relation {
            pub fn group(mut self, columns: &[&str]) -> Self {
                self.statement = self.statement.group_by(columns.iter().copied());
                self
            }
        }
    })
}

pub(super) fn having(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn having(cond: &str, args: Vec<::argen_runtime::Value>) -> #relation {
                Self::new_relation().having(cond, args)
            }
        }

        impl #relation {
            pub fn having(mut self, cond: &str, args: Vec<::argen_runtime::Value>) -> Self {
                self.statement = self.statement.having(cond, args);
                self
            }
        }
    })
}

pub(super) fn explain(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let relation = &e.model.relation;
    Ok(quote! {
        impl #relation {
            /// Runs the query plan of this relation instead of the query.
            pub fn explain(&self) -> ::argen_runtime::RuntimeResult<Vec<::argen_runtime::Row>> {
                let (sql, params) = self.statement.build_explain();
                DB.query(&sql, &params)
            }
        }
    })
}

pub(super) fn query(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #relation {
            pub fn query(&self) -> ::argen_runtime::RuntimeResult<Vec<#ident>> {
                let (sql, params) = self.statement.build();
                DB.query(&sql, &params)?
                    .iter()
                    .map(|row| self.decode(row))
                    .collect()
            }
        }
    })
}

pub(super) fn query_row(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #relation {
            pub fn query_row(&self) -> ::argen_runtime::RuntimeResult<#ident> {
                let (sql, params) = self.statement.build();
                let row = DB.query_row(&sql, &params)?;
                self.decode(&row)
            }
        }
    })
}

pub(super) fn exists(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let (ident, relation) = (&e.model.ident, &e.model.relation);
    Ok(quote! {
        impl #ident {
            pub fn exists() -> ::argen_runtime::RuntimeResult<bool> {
                Self::new_relation().exists()
            }
        }

        impl #relation {
            pub fn exists(&self) -> ::argen_runtime::RuntimeResult<bool> {
                let (sql, params) = self.statement.build_exists();
                Ok(!DB.query(&sql, &params)?.is_empty())
            }
        }
    })
}
