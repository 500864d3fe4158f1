#![doc = include_str!("../README.md")]

mod atom;
mod error;
mod matcher;
mod scan;
mod source;
mod status;
mod template;

pub use crate::atom::*;
pub use crate::error::*;
pub use crate::matcher::*;
pub use crate::scan::*;
pub use crate::source::*;
pub use crate::status::*;
pub use crate::template::*;
