pub mod action_executor;
pub mod backend;
pub mod config;
pub mod contract;
pub mod controller;
pub mod debounce;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod overlay_state;
pub mod preview;
pub mod query_dsl;
pub mod render;
pub mod runtime;
pub mod search_gateway;
pub mod shell;
pub mod transport;
