use super::enums::{ExportFormat, SidebarState, SortArg};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the data directory, database and default config")]
    Init,

    #[command(about = "Manage companies")]
    Company {
        #[command(subcommand)]
        command: CompanyCommand,
    },

    #[command(about = "Manage opportunities")]
    Opp {
        #[command(subcommand)]
        command: OppCommand,
    },

    #[command(about = "Manage an opportunity's demo links")]
    Link {
        #[command(subcommand)]
        command: LinkCommand,
    },

    #[command(about = "Manage file attachments")]
    Attach {
        #[command(subcommand)]
        command: AttachCommand,
    },

    #[command(about = "Filter the opportunity table by company or opportunity")]
    Filter {
        #[command(subcommand)]
        command: FilterCommand,
    },

    #[command(about = "Sidebar, column widths and table sort")]
    Layout {
        #[command(subcommand)]
        command: LayoutCommand,
    },

    #[command(about = "Re-render the table whenever the database changes")]
    Watch {
        #[arg(long, help = "Poll interval in milliseconds (overrides config)")]
        interval_ms: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum CompanyCommand {
    #[command(about = "Add a company")]
    Add {
        name: String,

        #[arg(long, help = "URL-safe slug (derived from the name by default)")]
        slug: Option<String>,
    },

    #[command(about = "List companies")]
    List,

    #[command(about = "Rename a company; its opportunities follow")]
    Rename {
        #[arg(help = "Company id or slug")]
        company: String,
        name: String,
    },

    #[command(about = "Remove a company; its opportunities keep the name")]
    Remove {
        #[arg(help = "Company id or slug")]
        company: String,
    },
}

/// Fields shared by `opp add` and `opp edit`
#[derive(Debug, Clone, Default, Args)]
pub struct OppFieldArgs {
    #[arg(long, help = "Company id or slug")]
    pub company: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, help = "Phase 0-4")]
    pub phase: Option<i64>,

    #[arg(long, help = "done, in_progress, paused, planned or not_go")]
    pub status: Option<String>,

    #[arg(long, help = "green, amber or red")]
    pub messaging: Option<String>,

    #[arg(long, help = "green, amber or red")]
    pub campaign: Option<String>,

    #[arg(long, help = "green, amber or red")]
    pub pricing: Option<String>,

    #[arg(long, help = "green, amber or red")]
    pub sales_alignment: Option<String>,

    #[arg(long, help = "Amount such as 2500000 or $2,500,000; empty clears")]
    pub market_size: Option<String>,

    #[arg(long, help = "YYYY-MM-DD; empty clears")]
    pub target_date: Option<String>,

    #[arg(long)]
    pub next_steps: Option<String>,
}

#[derive(Subcommand)]
pub enum OppCommand {
    #[command(about = "Create an opportunity")]
    Add {
        name: String,

        #[command(flatten)]
        fields: OppFieldArgs,

        #[arg(long = "link", help = "Demo link as URL or LABEL|URL (repeatable)")]
        links: Vec<String>,
    },

    #[command(about = "List opportunities through the saved filters and sort")]
    List {
        #[arg(long, help = "Sort for this listing only")]
        sort: Option<SortArg>,

        #[arg(long, help = "Descending (with --sort)")]
        desc: bool,

        #[arg(long, help = "Print totals per status")]
        summary: bool,
    },

    #[command(about = "Show one opportunity with links and attachments")]
    Show {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,
    },

    #[command(about = "Edit one field inline")]
    Set {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        #[arg(help = "name, description, phase, status, messaging, campaign, pricing, sales_alignment, market_size, target_date, next_steps, sort_order or company")]
        field: String,

        #[arg(help = "New value; empty clears optional fields", allow_hyphen_values = true)]
        value: String,
    },

    #[command(about = "Edit several fields through the full form")]
    Edit {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        fields: OppFieldArgs,

        #[arg(long, conflicts_with = "company", help = "Detach from its company")]
        clear_company: bool,
    },

    #[command(about = "Delete an opportunity with its attachments")]
    Delete {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,
    },

    #[command(about = "Move an opportunity to a position in manual order")]
    Move {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        #[arg(help = "Zero-based position")]
        position: usize,
    },

    #[command(about = "Group opportunities by target month")]
    Timeline,

    #[command(about = "Export the filtered table")]
    Export {
        #[arg(long, default_value = "csv")]
        to: ExportFormat,

        #[arg(long, short, help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum LinkCommand {
    #[command(about = "Add a demo link")]
    Add {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        url: String,

        #[arg(long, help = "Display label (may not contain '|')")]
        label: Option<String>,
    },

    #[command(about = "Remove a demo link by index")]
    Remove {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        index: usize,
    },

    #[command(about = "List demo links")]
    List {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,
    },
}

#[derive(Subcommand)]
pub enum AttachCommand {
    #[command(about = "Upload a file to an opportunity")]
    Upload {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,

        file: PathBuf,

        #[arg(long, help = "MIME type (guessed from the extension by default)")]
        mime: Option<String>,
    },

    #[command(about = "List an opportunity's attachments, newest first")]
    List {
        #[arg(help = "Opportunity id or id prefix")]
        id: String,
    },

    #[command(about = "Delete an attachment")]
    Delete { attachment_id: String },

    #[command(about = "Print an attachment's public URL")]
    Url { attachment_id: String },
}

#[derive(Subcommand)]
pub enum FilterCommand {
    #[command(about = "Company filter")]
    Company {
        #[command(subcommand)]
        action: FilterAction,
    },

    #[command(about = "Opportunity filter")]
    Opportunity {
        #[command(subcommand)]
        action: FilterAction,
    },
}

#[derive(Subcommand)]
pub enum FilterAction {
    #[command(about = "Stop filtering")]
    All,

    #[command(about = "Explicitly select every current entry")]
    SelectAll,

    #[command(about = "Select exactly these entries")]
    Only {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    #[command(about = "Flip one entry")]
    Toggle { id: String },

    #[command(about = "Select nothing")]
    Clear,

    #[command(about = "Show the filter")]
    Show,
}

#[derive(Subcommand)]
pub enum LayoutCommand {
    #[command(about = "Collapse, expand or toggle the sidebar")]
    Sidebar { state: SidebarState },

    #[command(about = "Set or reset a column width in pixels")]
    Column {
        name: String,

        #[arg(required_unless_present = "reset")]
        width: Option<u32>,

        #[arg(long)]
        reset: bool,
    },

    #[command(about = "Set the saved table sort")]
    Sort {
        key: SortArg,

        #[arg(long)]
        desc: bool,
    },

    #[command(about = "Show the saved layout")]
    Show,
}
