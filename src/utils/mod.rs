mod errors;
pub mod text;

pub use errors::Error;

pub type ShowmetaResult<T> = Result<T, Error>;
