//! Wire format and routing policy for hub traffic.
//!
//! This module provides the envelope codec and the per-type routing decisions
//! applied by the hub control loop.

pub mod codec;
pub mod router;
pub mod types;

pub use codec::{decode_envelope, decode_payload, encode_envelope, encode_frame};
pub use router::{plan_route, Route};
pub use types::{ChatInfo, Envelope, LocationInfo, Payload, ServerFrame};
