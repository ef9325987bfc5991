pub mod error;
pub mod event;
pub mod state;

pub use error::{Result, TrayError};
pub use event::Message;
pub use state::{CpuRate, Sample, SCALE};
