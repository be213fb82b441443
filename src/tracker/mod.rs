pub mod events;
pub mod options;
pub mod registry;
pub mod tracker;
