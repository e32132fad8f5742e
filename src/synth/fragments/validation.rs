use argen_runtime::validation::{Bound, Flag, Threshold, Validation};
use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::Expansion;
use crate::error::SynthResult;

pub(super) fn validation(e: &Expansion<'_, '_>) -> SynthResult<TokenStream> {
    let model = e.model;
    let ident = &model.ident;
    let checks = model.validated_fields().map(|f| {
        let (key, field) = (&f.key, &f.ident);
        let rule = validation_tokens(&f.validation);
        quote! {
            {
                static VALIDATOR: ::std::sync::LazyLock<::argen_runtime::Validator> =
                    ::std::sync::LazyLock::new(|| ::argen_runtime::Validator::new(#rule));
                let (_, messages) =
                    VALIDATOR.is_valid(&::argen_runtime::Value::from(self.#field.clone()));
                errors.merge_field(#key, messages);
            }
        }
    });
    Ok(quote! {
        impl #ident {
            /// Runs every field rule and collects all failures.
            pub fn is_valid(&self) -> (bool, ::argen_runtime::Errors) {
                let mut errors = ::argen_runtime::Errors::new();
                #(#checks)*
                (errors.is_empty(), errors)
            }
        }
    })
}

/// An expression that rebuilds `rule` at run time.
pub fn validation_tokens(rule: &Validation) -> TokenStream {
    let presence = option(&rule.presence, |p| {
        let message = &p.message;
        quote!(::argen_runtime::validation::Presence { message: String::from(#message) })
    });
    let format = option(&rule.format, |f| {
        let (with, message) = (&f.with, &f.message);
        quote! {
            ::argen_runtime::validation::Format {
                with: String::from(#with),
                message: String::from(#message),
            }
        }
    });
    let length = option(&rule.length, |l| {
        let (minimum, maximum, is) = (bound(&l.minimum), bound(&l.maximum), bound(&l.is));
        quote! {
            ::argen_runtime::validation::Length {
                minimum: #minimum,
                maximum: #maximum,
                is: #is,
            }
        }
    });
    let numericality = option(&rule.numericality, |n| {
        let only_integer = flag(&n.only_integer);
        let greater_than = option(&n.greater_than, threshold);
        let greater_than_or_equal_to = option(&n.greater_than_or_equal_to, threshold);
        let equal_to = option(&n.equal_to, threshold);
        let less_than = option(&n.less_than, threshold);
        let less_than_or_equal_to = option(&n.less_than_or_equal_to, threshold);
        let odd = flag(&n.odd);
        let even_message = &n.even_message;
        let message = &n.message;
        quote! {
            ::argen_runtime::validation::Numericality {
                only_integer: #only_integer,
                greater_than: #greater_than,
                greater_than_or_equal_to: #greater_than_or_equal_to,
                equal_to: #equal_to,
                less_than: #less_than,
                less_than_or_equal_to: #less_than_or_equal_to,
                odd: #odd,
                even_message: String::from(#even_message),
                message: String::from(#message),
            }
        }
    });
    quote! {
        ::argen_runtime::Validation {
            presence: #presence,
            format: #format,
            length: #length,
            numericality: #numericality,
        }
    }
}

fn option<T>(value: &Option<T>, render: impl Fn(&T) -> TokenStream) -> TokenStream {
    match value {
        Some(value) => {
            let inner = render(value);
            quote!(::core::option::Option::Some(#inner))
        }
        None => quote!(::core::option::Option::None),
    }
}

fn bound(bound: &Bound) -> TokenStream {
    let (number, message) = (Literal::usize_unsuffixed(bound.number), &bound.message);
    quote! {
        ::argen_runtime::validation::Bound {
            number: #number,
            message: String::from(#message),
        }
    }
}

fn flag(flag: &Flag) -> TokenStream {
    let (enabled, message) = (flag.enabled, &flag.message);
    quote! {
        ::argen_runtime::validation::Flag {
            enabled: #enabled,
            message: String::from(#message),
        }
    }
}

fn threshold(threshold: &Threshold) -> TokenStream {
    let number = if threshold.number < 0 {
        let magnitude = Literal::u64_unsuffixed(threshold.number.unsigned_abs());
        quote!(-#magnitude)
    } else {
        let number = Literal::i64_unsuffixed(threshold.number);
        quote!(#number)
    };
    let message = &threshold.message;
    quote! {
        ::argen_runtime::validation::Threshold {
            number: #number,
            message: String::from(#message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argen_runtime::validation::{Length, Numericality, Presence};

    fn render(rule: &Validation) -> String {
        let expr: syn::Expr = syn::parse2(validation_tokens(rule)).unwrap();
        quote!(#expr).to_string()
    }

    #[test]
    fn test_empty_rule_renders_nones() {
        let rendered = render(&Validation::new());
        assert_eq!(rendered.matches(":: core :: option :: Option :: None").count(), 4);
    }

    #[test]
    fn test_rule_values_are_carried() {
        let rule = Validation::new()
            .with_presence(Presence::default())
            .with_length(Length::default().with_is(5))
            .with_numericality(Numericality::default().only_integer().greater_than(-3));
        let rendered = render(&rule);
        assert!(rendered.contains("can't be blank"));
        assert!(rendered.contains("number : 5"));
        assert!(rendered.contains("number : - 3"));
        assert!(rendered.contains("enabled : true"));
        assert!(rendered.contains("must be greater than {count}"));
    }
}
