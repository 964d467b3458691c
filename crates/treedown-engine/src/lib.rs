pub mod compile;
pub mod document;
pub mod dump;
mod text;
pub mod tree;

// Re-export key types for easier usage
pub use compile::CompileFlags;
pub use document::Document;
pub use dump::DumpError;
pub use tree::{Alignment, BlockArena, BlockFlags, BlockId, BlockKind, BlockNode, BlockTree};
