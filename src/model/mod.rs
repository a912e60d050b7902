//! Wire types shared by every transport.

pub mod dtos;
pub mod structs;
