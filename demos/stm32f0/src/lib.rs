#![no_std]

pub mod pins;
pub mod time_source;
pub mod timers;
