pub mod command;
pub mod device;

pub use command::CommandStatus;
pub use device::{Device, RawStatus};
