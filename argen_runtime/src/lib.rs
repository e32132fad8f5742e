//! # argen runtime
//!
//! Everything code generated by `argen` calls into:
//!
//! - [`Handle`] and [`Connection`]: the write-once, process-wide persistence
//!   handle and the driver contract behind it
//! - [`ScopeRegistry`]: named scopes registered per model type
//! - [`query`]: `Select`/`Insert`/`Update`/`Delete` statement builders
//! - [`validation`]: the declarative field validation engine
//! - [`Value`], [`Row`] and [`FromValue`]: the dynamic value model
//!
//! Generated modules only reference paths under `::argen_runtime`, so the
//! application needs no other direct dependency. Model structs derive
//! [`ActiveRecord`] to make the `#[ar(...)]` field tags legal.

pub mod error;
pub mod handle;
pub mod query;
pub mod scope;
pub mod validation;
pub mod value;

pub use argen_macros::ActiveRecord;
pub use error::{RuntimeError, RuntimeResult};
pub use handle::{Connection, ExecResult, Handle};
pub use scope::{ScopeFn, ScopeRegistry};
pub use validation::{Errors, Validation, Validator};
pub use value::{FromValue, Row, Value};

pub mod __private {
    //! Re-exports used by generated code. Do not use directly.

    pub use log;
}

/// Whether `value` equals its type's default, i.e. a record with this
/// primary key has never been saved.
pub fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
