pub mod assembler;
pub mod bidding;
pub mod classifier;
pub mod context;
pub mod llm_json;
pub mod normalizer;
pub mod planner;
pub mod themes;

pub use crate::domain::model::{Keyword, RawKeyword, SemInputs, SemPlan};
pub use crate::domain::ports::{KeywordIdeaSource, Storage, TextGenerator};
pub use crate::utils::error::Result;
