//! CMS API access: HTTP client, typed payloads, and endpoint fallback chains.

mod client;
mod endpoints;
mod error;
mod types;

pub use client::CmsClient;
pub use endpoints::EndpointCandidates;
pub use error::CmsError;
pub use types::{ImageDetail, ImageMeta, PageDetail, PageMeta, Rendition};
