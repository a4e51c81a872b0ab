pub mod parsing;
pub mod sidecar;
pub mod template;
