//! Normalized storage for flat social activity data: schema, loader,
//! like counter maintenance and engagement reports over SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod expand;
pub mod loader;

pub use db::repositories::{
    CommentRepository, LikeRepository, PostRepository, ReportRepository, UserRepository,
};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use loader::{read_records, sample_records, ActivityLoader};
