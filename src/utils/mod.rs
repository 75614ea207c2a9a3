pub mod keyed_lock;
pub mod time_window;
pub mod validate;
