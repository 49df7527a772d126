pub mod deadline;
pub mod errors;
pub mod logging;
pub mod shutdown;

pub use deadline::with_deadline;
pub use errors::*;
pub use shutdown::*;
