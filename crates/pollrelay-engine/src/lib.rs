pub mod builder;
pub mod relay;

pub use builder::RelayBuilder;
pub use relay::{Relay, RelayConfig};
