pub mod summary;
pub mod table;
pub mod timeline;

pub use summary::Summary;
pub use table::{
    COLUMNS, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH, SortDirection, SortKey, TableSort, is_column,
    reorder, sort_rows,
};
pub use timeline::{TimelineGroup, UNSCHEDULED, group_by_month};
