//! A small Scheme: a reader for its data syntax and a tree-walking evaluator
#[macro_use]
extern crate gc;
#[macro_use]
extern crate log;

#[macro_use]
mod helpers;

pub mod config;
pub mod interpreter;
pub mod reader;
pub mod vm;
