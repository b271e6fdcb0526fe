pub mod api;
pub mod health;
pub mod page;

use crate::error::ServerError;

pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
