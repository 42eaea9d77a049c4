//! Natural-language query layer
//!
//! The classifier itself is an external, LLM-backed service; its output is
//! untrusted and normalized at the boundary before anything else sees it.
//! The router maps a normalized classification onto the data services and
//! degrades to a bounded default read instead of erroring when the intent is
//! unclear or the preferred source fails.

pub mod intent;
pub mod router;

pub use intent::{Classification, EntityBag, Intent, IntentClassifier, KeywordClassifier};
pub use router::{QueryRouter, RoutedAnswer, RoutedData};
