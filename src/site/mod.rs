//! Site collaborators around the backdrop renderer
//!
//! - `backdrop`: options for the third-party particle-network background
//! - `reveal`: one-shot section reveal tracking
//! - `contact`: contact-form submission outcomes

pub mod backdrop;
pub mod contact;
pub mod reveal;

pub use backdrop::{BackdropPreset, NetBackdropOptions};
pub use contact::{FormStatus, classify_response, settle};
#[cfg(not(target_arch = "wasm32"))]
pub use contact::submit;
pub use reveal::{Intersection, REVEAL_THRESHOLD, RevealTracker, VISIBLE_CLASS};
