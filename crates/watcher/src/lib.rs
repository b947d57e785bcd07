pub mod cache;
pub mod client;
pub mod formatter;
pub mod validator;
pub mod watcher;
