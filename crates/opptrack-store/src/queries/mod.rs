pub mod attachment;
pub mod company;
pub mod opportunity;
