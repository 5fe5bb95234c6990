pub mod cache;
pub mod login;
pub mod token;

pub use cache::{FileTokenCache, TokenCache};
pub use login::AuthService;
pub use token::DeviceToken;
