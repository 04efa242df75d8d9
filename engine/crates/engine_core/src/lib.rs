pub mod clock;
pub mod events;
pub mod tick;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use events::EventQueue;
pub use tick::{TickConfig, TickHandler, TickLoop};
