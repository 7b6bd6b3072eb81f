mod attachments;
mod companies;
mod opportunities;
mod tracker;

pub use attachments::{AttachmentOps, DeleteOutcome};
pub use companies::CompanyOps;
pub use opportunities::{DeleteReport, EditOutcome, OpportunityOps};
pub use tracker::{DB_FILE, Tracker};
