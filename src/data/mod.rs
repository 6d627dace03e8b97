//! Loading and validating the Our World in Data CO₂ dataset.

mod owid;

pub use owid::{ENTITY_COLUMN, REQUIRED_COLUMNS, component_sum_check, load_world_table, read_world_table};
