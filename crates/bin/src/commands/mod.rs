pub mod access;
pub mod account;
pub mod info;
