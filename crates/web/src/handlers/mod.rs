pub mod analysis;
pub mod pages;
