use anyhow::Result;

use super::HandlerContext;
use crate::args::LinkCommand;
use crate::presentation::views::{LinkListView, LinkRow, MessageView};

pub fn handle(ctx: &HandlerContext, command: LinkCommand) -> Result<()> {
    let ops = ctx.tracker.opportunities();

    match command {
        LinkCommand::Add { id, url, label } => {
            let opp = ops.add_link(&id, label.as_deref().unwrap_or(""), &url)?;
            let links = ops.links(&opp.id)?;
            ctx.render(&LinkListView {
                opportunity_id: opp.id,
                links: LinkRow::rows(links.links()),
            })
        }
        LinkCommand::Remove { id, index } => {
            let removed = ops.remove_link(&id, index)?;
            ctx.render(&MessageView::new(format!(
                "Removed demo link {}",
                removed.display()
            )))
        }
        LinkCommand::List { id } => {
            let opp = ops.resolve(&id)?;
            let links = ops.links(&opp.id)?;
            ctx.render(&LinkListView {
                opportunity_id: opp.id,
                links: LinkRow::rows(links.links()),
            })
        }
    }
}
