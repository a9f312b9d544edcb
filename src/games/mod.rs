//! Game rules engines.

pub mod ayu;
