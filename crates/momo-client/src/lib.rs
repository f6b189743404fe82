//! Typed async client for the Momo memory/document/search API.
//!
//! ```no_run
//! # async fn demo() -> Result<(), momo_client::ClientError> {
//! use momo_client::{MomoClient, MomoClientConfig, RequestOptions};
//! use momo_types::CreateDocumentRequest;
//!
//! let client = MomoClient::new(
//!     MomoClientConfig::new("http://localhost:3000")
//!         .with_api_key("secret")
//!         .with_default_container_tag("notes"),
//! )?;
//! let created = client
//!     .documents()
//!     .create(CreateDocumentRequest::new("hello"), &RequestOptions::default())
//!     .await?;
//! println!("{}", created.document_id);
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod groups;
pub mod middleware;
mod options;
pub mod raw;

pub use client::{MomoClient, MomoClientConfig};
pub use error::{ClientError, MomoError};
pub use groups::UploadFile;
pub use middleware::ApiKeyProvider;
pub use options::RequestOptions;
pub use raw::{RawClient, RawRequest, RawResponse};

pub use momo_types::ErrorCode;
pub use tokio_util::sync::CancellationToken;

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
