pub mod demo_link;
pub mod domain;
pub mod error;
pub mod format;
pub mod patch;
mod util;

pub use demo_link::{DemoLink, DemoLinks};
pub use domain::*;
pub use error::{Error, Result};
pub use patch::{FieldPatch, OpportunityField};
pub use util::*;
