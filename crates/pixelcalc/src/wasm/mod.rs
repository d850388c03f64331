//! Browser frontend
//!
//! The page types build and update a DOM tree and run natively against
//! [`MockDom`]; the wasm-bindgen wrappers in `browser` expose them to JS.

#[cfg(feature = "wasm")]
mod browser;
pub mod dom;
mod driver;
mod prank;
mod scientific;

#[cfg(feature = "wasm")]
pub use browser::{BrowserCalculator, BrowserPrank};
pub use dom::{DomElement, DomEvent, MockDom};
pub use driver::WasmDriver;
pub use prank::WasmPrank;
pub use scientific::WasmCalculator;
