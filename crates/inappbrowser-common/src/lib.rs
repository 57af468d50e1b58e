pub mod bridge;
pub mod errors;
pub mod id;

pub use bridge::{Bridge, CallbackContext, PluginResult, Status};
pub use errors::{ConfigError, HandoffError, IabError, ViewError};
pub use id::{new_id, SessionId};

pub type Result<T> = std::result::Result<T, IabError>;
