pub mod error;
pub mod reaper;
pub mod session;
pub mod store;

pub use error::{Result, StoreError};
pub use reaper::{SessionReaper, DEFAULT_SESSION_TTL};
pub use session::{Session, SessionId};
pub use store::SessionStore;
