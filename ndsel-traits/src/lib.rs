//! Shared traits for the ndsel crates.
//!
//! `ndsel-selector` is element-agnostic; this crate holds the bound that
//! the array crate places on everything it stores, so downstream crates can
//! name it without pulling in the array implementation.

pub mod element;

pub use element::Element;
