pub mod auto_label;
pub mod central;
pub mod side;
pub mod statistics;
pub mod top;
