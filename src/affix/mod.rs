mod core;


pub use self::core::{AffixRules, Trim};
