//! # blitz-gateway
//!
//! Resolves encrypted file references for the Blitz storefront back office.
//!
//! A caller holds a token minted by [`blitz_token::TokenCodec`]. The
//! [`Gateway`] turns it back into content:
//!
//! ```text
//! Authorize → Decode → PolicyCheck → { ConfigLookup | FilesystemRead } → Respond
//! ```
//!
//! - Only admin callers get past `Authorize`, and nothing is decoded before that.
//! - Decode failures are returned verbatim (see [`blitz_token::DecodeError`]).
//! - A small static [`PolicyTable`] redirects decoy references such as
//!   `../../flag.txt` to a [`ConfigStore`] key instead of the filesystem.
//! - Everything else is read from disk, relative references under the uploads
//!   directory, absolute ones as given.
//!
//! The crate also carries the HTTP surface around it: session login, the
//! `/view` endpoint, attachment uploads that mint tokens, and a health check.

pub mod error;
pub mod gateway;
pub mod handlers;
pub mod policy;
pub mod resource;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod store;
pub mod upload;

pub use error::{GatewayError, StartupError};
pub use gateway::Gateway;
pub use policy::PolicyTable;
pub use resource::{ContentKind, Resource, ResourceReader};
pub use server::GatewayServer;
pub use session::{Caller, Session, SessionStore};
pub use state::AppState;
pub use store::{ConfigStore, SqliteConfigStore, StaticConfigStore, StoreError};
pub use upload::{AttachmentReceipt, AttachmentStore, UploadError};
