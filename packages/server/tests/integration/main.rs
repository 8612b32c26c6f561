mod common;

mod auth;
mod instruction;
