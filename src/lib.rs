//! Coin counting on top of the coinsum detector.

pub mod counter;
