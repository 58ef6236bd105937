/// Edit gating from the admin credential.
pub mod access;
pub mod address;
/// Query-string encoding of the parameter set.
pub mod query;
pub mod session;

pub use access::Access;
pub use address::{AddressBar, MemoryAddressBar, SyncError};
pub use session::{Session, SessionError};
