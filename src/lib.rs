//! Page outline ("table of contents") construction and active-entry tracking.
//!
//! [`outline::build`] turns document-ordered headings into a nested outline
//! with collision-free ids; [`resolver::Resolver`] keeps exactly one entry
//! highlighted as fragment, visibility and click events arrive.

pub mod config;
pub mod error;
pub mod format;
pub mod outline;
pub mod read;
pub mod resolver;
pub mod session;
pub mod types;

pub use error::TocError;
pub use outline::{build, build_page, build_with_title, uniquify, Outline};
pub use resolver::{
    ActiveSelection, Resolution, ResolutionRequest, Resolver, SelectionChange, SelectionSink,
    VisibilityChange,
};
pub use types::{HeadingDescriptor, HeadingKind, Mode, OutlineEntry, Page, PageTitle};
