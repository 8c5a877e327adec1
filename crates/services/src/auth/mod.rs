pub mod callback;
pub mod exchange;
pub mod mappers;
pub mod ports;

pub use callback::{CallbackError, CallbackParams, CallbackService};
pub use exchange::HttpSessionExchangeClient;
pub use ports::{AuthSession, CodeExchange, ResponseDirective, SessionExchangeClient};
