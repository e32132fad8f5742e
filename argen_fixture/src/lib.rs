//! Sample models and the module `argen` generates for them at build time.

pub mod models;

include!(concat!(env!("OUT_DIR"), "/records_mod.rs"));
