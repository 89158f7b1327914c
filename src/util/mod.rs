pub(crate) mod diagnostics;
pub(crate) mod json;
pub mod url;
