pub mod predict;
pub mod recommend;
pub mod simulate;
pub mod summarize;
pub mod train;
