//! Extraction options

use smol_str::SmolStr;

/// Identifiers the extractors look for in attributes and payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Item attribute carrying a decomposition request: `[@@decomp ...]`
    pub decomp_attribute: SmolStr,
    /// Item attribute marking a function opaque: `[@@opaque]`
    pub opaque_attribute: SmolStr,
    /// Item attribute carrying a termination measure: `[@@measure ...]`
    pub measure_attribute: SmolStr,
    /// Floating attribute declaring an import: `[@@@import ...]`
    pub import_attribute: SmolStr,
    /// Head of the decomposition configuration call
    pub decomp_head: SmolStr,
    /// Extension wrapping identifier references: `[%id name]`
    pub reference_extension: SmolStr,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            decomp_attribute: SmolStr::new_static("decomp"),
            opaque_attribute: SmolStr::new_static("opaque"),
            measure_attribute: SmolStr::new_static("measure"),
            import_attribute: SmolStr::new_static("import"),
            decomp_head: SmolStr::new_static("top"),
            reference_extension: SmolStr::new_static("id"),
        }
    }
}

impl ExtractOptions {
    /// Quote an id for use inside a query string literal
    pub(crate) fn quoted(id: &str) -> String {
        format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
    }
}
