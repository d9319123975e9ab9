//! Feature engineering: the fitted encoding and the vectors it produces.
pub mod encoding;
pub mod vector;

pub use encoding::{
    normalize_category, CategoryCode, CategoryVocabulary, FeatureEncoding, ImputationDefaults,
    UnseenCategory, BASE_COLUMNS, FALLBACK_CATEGORY, FEATURE_SCHEMA_VERSION,
};
pub use vector::{check_columns, FeatureVector};
