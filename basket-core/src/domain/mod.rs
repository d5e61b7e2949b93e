//! Domain models

pub mod common;
pub mod location;
pub mod order;
pub mod product;
pub mod user;

pub use common::*;
pub use location::*;
pub use order::*;
pub use product::*;
pub use user::*;
