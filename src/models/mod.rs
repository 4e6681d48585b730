pub mod catalog;
pub mod reply;
pub mod requests;
