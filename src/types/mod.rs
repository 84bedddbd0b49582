pub mod trading;

pub use trading::*;
