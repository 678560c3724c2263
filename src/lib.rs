// error_chain macro can recurse deeply
#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use(lazy_static)]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod analysis;
pub mod args;
pub mod commands;
pub mod constants;
pub mod context;
pub mod errors;
pub mod export;
pub mod index;
pub mod logging;
pub mod progress;
pub mod risk;
pub mod search;
pub mod sequence;
pub mod store;
pub mod table;
pub mod thermo;
