pub mod pagination;
pub mod sorting;
