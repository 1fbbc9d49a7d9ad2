//! Custom extractors for Axum handlers.

pub mod id_path;
pub mod lenient_json;

pub use id_path::IdPath;
pub use lenient_json::LenientJson;
