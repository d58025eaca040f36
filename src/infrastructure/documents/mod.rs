//! Document source implementations

mod directory;
mod files;

pub use directory::DirectoryDocumentSource;
pub use files::FileListDocumentSource;
