pub mod audit;
pub mod diagnostics;
pub mod error;
pub mod health;
pub mod history;
pub mod lock;
pub mod messages;
pub mod notification;
pub mod permission;
pub mod presence;
pub mod session;

pub use audit::*;
pub use diagnostics::*;
pub use error::*;
pub use health::*;
pub use history::*;
pub use lock::*;
pub use messages::*;
pub use notification::*;
pub use permission::*;
pub use presence::*;
pub use session::*;
