pub mod badges;
pub mod exercises;
pub mod progress;
pub mod stats;
pub mod submissions;
pub mod tasks;
