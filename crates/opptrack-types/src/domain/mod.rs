mod attachment;
mod company;
mod opportunity;

pub use attachment::*;
pub use company::*;
pub use opportunity::*;
