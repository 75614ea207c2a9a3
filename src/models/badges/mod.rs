pub mod entities;
pub mod registry;

pub use registry::BadgeRegistry;
