//! CLI command implementations.

pub(crate) mod export;
pub(crate) mod preview;
pub(crate) mod serve;

pub(crate) use export::ExportArgs;
pub(crate) use preview::PreviewArgs;
pub(crate) use serve::ServeArgs;
