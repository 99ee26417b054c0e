pub mod breed;
pub mod game_events;
pub mod round;

// Re-export main components
pub use breed::*;
pub use game_events::*;
pub use round::*;
