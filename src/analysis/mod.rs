//! Analysis result types

pub mod result;

pub use result::{BandOnsets, ClipFlags, Key, KeyEstimate, ResultSet};
