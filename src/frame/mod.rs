//! Frame host integration
//!
//! Static documents describing the app to the social client that hosts it,
//! plus the launch context the host passes back in.
//!
//! ```text
//!   FrameConfig ──► FrameManifest   (/.well-known/farcaster.json)
//!               └─► Embed x2        (fc:miniapp, fc:frame meta tags)
//!
//!   host JSON ────► FrameContext ──► username for the profile
//! ```

pub mod context;
pub mod embed;
pub mod manifest;

pub use context::{FrameContext, FrameUser};
pub use embed::{embed_meta_tags, Embed, LaunchAction};
pub use manifest::{AccountAssociation, AssociationHeader, FrameManifest, CACHE_CONTROL};
