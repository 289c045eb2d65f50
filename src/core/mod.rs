pub mod efficiency;
pub mod projection;
pub mod series;
pub mod theoretical;
pub mod units;
pub mod validation;
