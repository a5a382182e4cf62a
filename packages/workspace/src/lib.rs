//! # Siteforge Workspace
//!
//! HTTP service hosting editor sessions: site load/save, action dispatch,
//! and publishing to the hosting provider.

pub mod auth;
pub mod client;
pub mod error;
pub mod hosting;
pub mod server;
pub mod sessions;

pub use auth::{AuthUser, TokenAuth};
pub use client::PublishClient;
pub use error::{PublishError, ServerError};
pub use hosting::{public_url, Deployer, HostingClient, HostingSettings, DEFAULT_HOSTING_API_URL};
pub use server::{build_router, serve, AppState, DispatchResponse, ServerConfig};
pub use sessions::{SessionRegistry, SharedSession};
