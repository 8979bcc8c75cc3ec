//! Core functionality for directory mapping and tree building

pub mod cancel;
pub mod mapper;
pub mod tree_builder;

pub use cancel::CancellationToken;
pub use mapper::DirectoryMapper;
pub use tree_builder::{tree_builder, TreeBuilder};
