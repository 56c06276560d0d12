//! # aurora-protocol
//!
//! Wire messages and framing for the inter-process work-stealing
//! distributor. The transport only moves byte buffers; everything typed
//! lives here.

pub mod codec;
pub mod messages;

pub use codec::PeerCodec;
pub use messages::{PeerMessage, WireItem, WireSolution};
