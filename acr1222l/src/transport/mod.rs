// acr1222l-rs/acr1222l/src/transport/mod.rs

pub mod mock;
#[cfg(feature = "pcsc")]
pub mod pcsc;
pub mod traits;

pub use mock::{MockBackend, MockTransport};
#[cfg(feature = "pcsc")]
pub use self::pcsc::{PcscBackend, PcscTransport};
pub use traits::{Backend, Transport};
