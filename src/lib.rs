pub mod bindings;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod frame;
pub mod host;
pub mod selector;
pub mod status;
pub mod store;
pub mod theme;
pub mod watch;

pub use controller::{Controller, ControllerSettings, Dispatcher};
