pub mod app;
pub mod client;
pub mod config;
pub mod error;
pub mod interface;
pub mod model;
pub mod session;
pub mod store;
pub mod token;

#[cfg(feature = "no-wasm")]
pub use client::request::ReqwestClient;
#[cfg(feature = "wasm")]
pub use client::gloo::GlooClient;
