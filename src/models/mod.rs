pub mod watch_item;
pub mod item_name_id;

// Re-exports for convenience
pub use watch_item::*;
pub use item_name_id::*;
