//! Anchor-based field extraction.
//!
//! A [`Template`] is an ordered list of [`AnchorRule`]s for one invoice
//! layout. Each rule finds a literal label on the page, optionally narrows
//! down to a second label near it, derives a capture region from the label's
//! box and reads the text inside it.

mod builtin;
mod pipeline;
mod postprocess;
mod registry;
mod rule;
mod template;

pub use builtin::{boa_vista, builtin_templates, BOA_VISTA};
pub use pipeline::{BatchJob, Extractor};
pub use postprocess::{apply_all, Pattern, PostProcess};
pub use registry::TemplateRegistry;
pub use rule::{AnchorRule, Coord, Edge, RegionOffset, RuleTrace, SecondaryAnchor};
pub use template::Template;
