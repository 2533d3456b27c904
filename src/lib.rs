// src/lib.rs
#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod util;
pub mod slice;
pub mod model;
mod syntax;

pub mod analyzer;
pub mod python_analyzer;
pub mod js_analyzer;
pub mod rs_analyzer;

pub mod scan;
pub mod selection;
pub mod bundle;
pub mod inventory;
pub mod tree_view;
pub mod config;
pub mod export;

pub mod commands;
