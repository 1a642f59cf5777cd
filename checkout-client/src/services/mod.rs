pub mod auth;
pub mod directory;
pub mod relay;
pub mod session;
pub mod snap;

pub use auth::Authenticator;
pub use directory::{InMemoryDirectory, SchoolDirectory};
pub use relay::{HttpRelayClient, RelayClient};
pub use session::{InMemorySessionRepository, SessionRepository};
pub use snap::{ScriptLoader, SnapLoader, SnapOutcome, SnapWidget};
