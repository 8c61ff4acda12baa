#![no_std]

#[cfg(feature = "async")]
pub mod asynch;
#[cfg(feature = "blocking")]
pub mod blocking;
pub mod common;
pub mod conversions;
pub mod error;

mod crc;
mod utils;
