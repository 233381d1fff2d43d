// Service exports
pub mod decisions;
pub mod driver;
pub mod sessions;

pub use decisions::DecisionLog;
pub use driver::FrameDriver;
pub use sessions::{Session, SessionController, SessionError, SessionStore};
