//! Store access: initialization, schema, models and queries

pub mod filters;
pub mod init;
pub mod menus;
pub mod models;
pub mod schema;
pub mod schema_sync;
pub mod tallies;

pub use filters::{DepartmentFilter, TallyFilter};
pub use init::{initialize_store, open_store, seed_default_menus, SeedOutcome, StoreOptions, DEFAULT_MENUS};
pub use menus::{count_menu_options, list_interaction_types, list_menu_options};
pub use models::{FeedbackEntry, MenuOption, NewTally, Tally};
pub use schema::ensure_schema;
pub use tallies::{insert_tally, list_feedback, list_tallies};
