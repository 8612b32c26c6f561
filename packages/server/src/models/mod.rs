pub mod auth;
pub mod instruction;
pub mod product;
pub mod shared;
