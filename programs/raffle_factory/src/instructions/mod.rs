pub mod admin;
pub mod lifecycle;
pub mod registry;
pub mod ticket;
