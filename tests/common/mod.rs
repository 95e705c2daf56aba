#![allow(dead_code)]

pub mod builders;

pub use builders::*;
pub use fakes::*;
pub use strategies::*;
