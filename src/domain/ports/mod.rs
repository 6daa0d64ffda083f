mod clock_port;
mod directory_port;

pub use clock_port::{Clock, SystemClock};
pub use directory_port::DirectoryLister;
