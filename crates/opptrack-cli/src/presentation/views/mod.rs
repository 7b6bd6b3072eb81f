mod attachment;
mod company;
mod layout;
mod link;
mod message;
mod opportunity;

pub use attachment::{AttachmentDeletedView, AttachmentListView, AttachmentUrlView, AttachmentView};
pub use company::{CompanyListView, CompanyView};
pub use layout::{FilterView, LayoutView, filter_line};
pub use link::LinkListView;
pub use message::{InitView, MessageView};
pub use opportunity::{
    ColumnChars, DeletedView, EditView, LinkRow, MovedView, OpportunityDetailView,
    OpportunityTableView, SavedView, TimelineView, patch_value, short_id,
};
