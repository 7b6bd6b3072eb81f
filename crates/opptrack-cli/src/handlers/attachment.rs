use anyhow::Result;

use super::HandlerContext;
use crate::args::AttachCommand;
use crate::presentation::views::{
    AttachmentDeletedView, AttachmentListView, AttachmentUrlView, AttachmentView,
};

pub fn handle(ctx: &HandlerContext, command: AttachCommand) -> Result<()> {
    let attachments = ctx.tracker.attachments();

    match command {
        AttachCommand::Upload { id, file, mime } => {
            let opp = ctx.tracker.opportunities().resolve(&id)?;
            let attachment = attachments.upload_file(&opp.id, &file, mime.as_deref())?;
            let url = attachments.public_url(&attachment)?;
            ctx.render(&AttachmentView { attachment, url })
        }
        AttachCommand::List { id } => {
            let opp = ctx.tracker.opportunities().resolve(&id)?;
            ctx.render(&AttachmentListView {
                attachments: attachments.list(&opp.id)?,
                opportunity_id: opp.id,
            })
        }
        AttachCommand::Delete { attachment_id } => {
            let outcome = attachments.delete_by_id(&attachment_id)?;
            ctx.render(&AttachmentDeletedView {
                attachment_id: outcome.attachment_id,
                orphaned_blob: outcome.orphaned_blob,
            })
        }
        AttachCommand::Url { attachment_id } => {
            let attachment = attachments.get(&attachment_id)?;
            ctx.render(&AttachmentUrlView {
                url: attachments.public_url(&attachment)?,
                attachment_id: attachment.id,
            })
        }
    }
}
