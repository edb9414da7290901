pub mod ask;
pub mod auth;
pub mod board;
pub mod client;
pub mod error;
pub mod facts;
pub mod model;
pub mod payload;

pub use ask::ChunkStream;
pub use board::{FactBoard, Notice};
pub use client::ApiClient;
pub use error::ApiError;
pub use model::Fact;
