//! Aggregations over a [`LabeledTable`](crate::data::table::LabeledTable).
//!
//! Leaves first: `numeric` extracts valid values, `descriptive` and
//! `histogram` summarize one sample, `correlation` compares features,
//! `matrix` tallies label pairs and `classes` reruns the rest per class.

pub mod classes;
pub mod correlation;
pub mod descriptive;
pub mod histogram;
pub mod matrix;
pub mod numeric;
