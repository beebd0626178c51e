pub mod aggregate;
pub mod layout;
