//! Distill Synthesis
//!
//! Turns each theme into a [`SynthesisChapter`](distill_domain::SynthesisChapter)
//! built from the analyses of its member documents.
//!
//! Synthesis is a pure function of the theme and the analyzed documents.
//! Themes are independent, so a failure on one theme is recorded and the
//! rest still produce chapters.
//!
//! # Examples
//!
//! ```
//! use distill_domain::{PatternReport, Theme};
//! use distill_synthesizer::Synthesizer;
//!
//! let orphaned = Theme {
//!     theme_id: "theme_000".to_string(),
//!     name: "Empty".to_string(),
//!     description: String::new(),
//!     document_ids: Vec::new(),
//!     key_concepts: Vec::new(),
//!     importance_score: 0.0,
//!     cross_cutting: false,
//!     related_theme_ids: Vec::new(),
//! };
//! let failure = Synthesizer::new()
//!     .synthesize_item(&orphaned, &[], &PatternReport::default())
//!     .unwrap_err();
//! assert_eq!(failure.item_id, "theme_000");
//! ```

#![warn(missing_docs)]

mod error;
mod synthesizer;

pub use error::SynthesizerError;
pub use synthesizer::{Synthesizer, FALLBACK_IMPLICATION, OPEN_QUESTIONS};
