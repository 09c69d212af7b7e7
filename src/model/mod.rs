pub mod asset;
pub mod common;
pub mod connector;
pub mod mutation;
pub mod qualified_name;
pub mod reference;
pub mod search;
pub mod type_name;

pub use asset::*;
pub use common::*;
pub use connector::*;
pub use mutation::*;
pub use qualified_name::*;
pub use reference::*;
pub use search::*;
pub use type_name::*;
