pub mod asset;
pub mod job;
pub mod request;

pub use asset::*;
pub use job::*;
pub use request::*;
