pub mod auth;
pub mod cookies;
pub mod http;
pub mod organization;
pub mod session;
pub mod user;

pub use auth::callback::{CallbackError, CallbackParams, CallbackService};
pub use auth::ports::{AuthSession, ResponseDirective, UserId, UserRecord};
