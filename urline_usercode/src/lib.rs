//! Demo command set and completion dictionary for the urline shell.

#![no_std]

pub mod commands;
pub mod complete;
