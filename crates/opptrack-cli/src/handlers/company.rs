use anyhow::Result;

use super::HandlerContext;
use crate::args::CompanyCommand;
use crate::presentation::views::{CompanyListView, CompanyView};

pub fn handle(ctx: &HandlerContext, command: CompanyCommand) -> Result<()> {
    let companies = ctx.tracker.companies();

    match command {
        CompanyCommand::Add { name, slug } => {
            let company = companies.add(&name, slug.as_deref())?;
            ctx.render(&CompanyView {
                action: "Added",
                company,
            })
        }
        CompanyCommand::List => ctx.render(&CompanyListView {
            companies: companies.list()?,
        }),
        CompanyCommand::Rename { company, name } => {
            let company = companies.rename(&company, &name)?;
            ctx.render(&CompanyView {
                action: "Renamed",
                company,
            })
        }
        CompanyCommand::Remove { company } => {
            let company = companies.remove(&company)?;
            ctx.render(&CompanyView {
                action: "Removed",
                company,
            })
        }
    }
}
