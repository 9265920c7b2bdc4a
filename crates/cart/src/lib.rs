//! Client-side cart session.
//!
//! [`CartSession`] owns the shopper's current cart, applies the cart
//! operations locally and pushes every resulting snapshot to the storefront
//! in the background. A failed push never rolls the local cart back.

mod session;
mod sync;

pub use self::session::{CartSession, SyncNotice};
pub use self::sync::{CartSyncTrait, DynCartSync, HttpCartSync, SyncError};
