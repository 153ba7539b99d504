//! Text normalization and keyword classification.
//!
//! # Module Structure
//!
//! - `normalize`: Unicode-aware normalization of free text for matching
//! - `keywords`: semantic keyword registry (cancel / yes / no / skip / city change)

pub mod keywords;
pub mod normalize;

pub use keywords::{KeywordCategory, is_keyword, is_keyword_norm};
pub use normalize::{normalize_for_match, normalize_token, strip_niqqud};
