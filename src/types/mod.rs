// ABOUTME: Validated domain types shared by resolution and session code.
// ABOUTME: Filter tags, address preference, resolved targets, and session requests.

mod address;
mod filter_tag;
mod request;
mod target;

pub use address::AddressPreference;
pub use filter_tag::{DEFAULT_TAG_KEY, FilterTag, FilterTagError};
pub use request::{RequestError, SessionRequest, SessionRequestBuilder, split_login};
pub use target::{DEFAULT_SSH_PORT, Target};
