#![allow(dead_code)]

pub mod source_fixtures;

use iml_query::Extractor;
use once_cell::sync::Lazy;

/// Extractor with default options, compiled once per test binary
pub static EXTRACTOR: Lazy<Extractor> = Lazy::new(|| match Extractor::new() {
    Ok(extractor) => extractor,
    Err(err) => panic!("default queries must compile: {err}"),
});
