pub mod init;
pub mod lock;
pub mod misc;
pub mod seal;
pub mod status;
pub mod unlock;

pub use init::handle_init;
pub use lock::handle_lock;
pub use misc::handle_completions;
pub use seal::handle_seal;
pub use status::handle_status;
pub use unlock::handle_unlock;
