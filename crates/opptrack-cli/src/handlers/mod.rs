mod context;

pub mod attachment;
pub mod company;
pub mod export;
pub mod filter;
pub mod init;
pub mod layout;
pub mod link;
pub mod opportunity;
pub mod watch;

pub use context::HandlerContext;
