pub mod analyzer;
pub mod export;
pub mod loader;
pub mod parser;
pub mod projector;
pub mod share;
