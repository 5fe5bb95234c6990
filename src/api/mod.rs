pub mod client;
pub mod models;
pub mod oidc;
pub mod portal;

pub use client::SsoClient;
pub use models::{
    AccountView, DeviceAuthorization, IssuedToken, RegisteredClient, RoleView, TokenPoll,
};
