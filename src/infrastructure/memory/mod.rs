pub mod flat_index;
