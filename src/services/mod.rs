pub mod catalog;
pub mod dialogue;
pub mod dispatcher;
pub mod locks;
pub mod store;
