//! Distill Thematic Clustering
//!
//! Groups analyzed documents into named themes.
//!
//! Each document is assigned by its first tag only. Groups with fewer than
//! two members are not themes, and their documents are reported as orphans,
//! so the theme structure always partitions the analyzed set.
//!
//! # Examples
//!
//! ```
//! use distill_clusterer::Clusterer;
//! use distill_domain::PatternReport;
//!
//! let structure = Clusterer::new().cluster(&[], &PatternReport::default());
//! assert!(structure.themes.is_empty());
//! assert!(structure.orphan_documents.is_empty());
//! ```

#![warn(missing_docs)]

mod clusterer;

pub use clusterer::{importance, theme_name, Clusterer, MIN_THEME_MEMBERS};
