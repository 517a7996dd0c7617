pub mod dispatcher;
pub mod downloads;
pub mod host;
pub mod links;
pub mod notifications;
pub mod providers;
pub mod sorting;
pub mod store;
