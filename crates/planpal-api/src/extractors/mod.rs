//! Request extractors

mod auth;
mod pagination;
mod validated_json;

pub use auth::AuthUser;
pub use pagination::Pagination;
pub use validated_json::ValidatedJson;
