//! Core wire-protocol types for the stdbus D-Bus implementation.
//!
//! This crate carries the pieces every other stdbus crate needs: the raw
//! protocol constants and the signature machinery. It has no dependencies so
//! it can be shared freely.

#![allow(clippy::module_inception)]

#[macro_use]
mod macros;

pub mod proto;

pub mod signature;
