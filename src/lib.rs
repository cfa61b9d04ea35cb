// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod convert;
pub mod input;
pub mod parser;
pub mod progress;
pub mod verify;
pub mod writer;
