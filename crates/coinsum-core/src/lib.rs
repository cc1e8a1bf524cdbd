//! Domain types for coin counting: detected circles, the near-duplicate merge
//! rule, and radius-tier valuation.

pub mod circle;
pub mod coins;
pub mod error;

pub use circle::{Circle, CircleSet};
pub use coins::{classify, Coin, Denominations, Tier, Valuation};
pub use error::{DetectionError, RadiusSource};
