use anyhow::{Result, bail};
use opptrack_runtime::TableSort;
use opptrack_runtime::view::is_column;

use super::HandlerContext;
use crate::args::{LayoutCommand, SidebarState, direction};
use crate::presentation::views::LayoutView;

pub fn handle(ctx: &HandlerContext, command: LayoutCommand) -> Result<()> {
    let mut state = ctx.tracker.load_view_state();

    match command {
        LayoutCommand::Sidebar { state: sidebar } => {
            state.sidebar_collapsed = match sidebar {
                SidebarState::Collapse => true,
                SidebarState::Expand => false,
                SidebarState::Toggle => !state.sidebar_collapsed,
            };
        }
        LayoutCommand::Column { name, width, reset } => {
            if reset {
                if !is_column(&name) {
                    bail!("Unknown column '{}'", name);
                }
                state.reset_column_width(&name);
            } else if let Some(width) = width {
                state.set_column_width(&name, width)?;
            }
        }
        LayoutCommand::Sort { key, desc } => {
            state.sort = TableSort::new(key.into(), direction(desc));
        }
        LayoutCommand::Show => return ctx.render(&LayoutView::from_state(&state)),
    }

    ctx.tracker.save_view_state(&state)?;
    ctx.render(&LayoutView::from_state(&state))
}
