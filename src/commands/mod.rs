pub mod common;
pub mod export;
pub mod import;

pub use common::GlobalOptions;
pub use export::Export;
pub use import::Import;
