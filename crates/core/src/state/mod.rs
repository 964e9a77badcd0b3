//! Run lifecycle state, cancellation, and the concurrent run manager.

pub mod cancel;
pub mod manager;
pub mod run;

pub use cancel::CancelToken;
pub use manager::RunManager;
