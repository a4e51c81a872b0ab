pub mod custom;
pub mod dispatcher;
pub mod extract;
pub mod patterns;
pub mod strategy;
pub mod types;

pub use custom::CustomParserConfig;
pub use dispatcher::EpisodeParser;
pub use types::*;
