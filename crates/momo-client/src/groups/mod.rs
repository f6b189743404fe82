//! Per-resource convenience groups over the raw client.

mod admin;
mod conversations;
mod documents;
mod graph;
mod health;
mod memories;
mod profile;
mod search;

pub use admin::AdminGroup;
pub use conversations::ConversationsGroup;
pub use documents::{DocumentsGroup, UploadFile};
pub use graph::GraphGroup;
pub use health::HealthGroup;
pub use memories::MemoriesGroup;
pub use profile::ProfileGroup;
pub use search::SearchGroup;
