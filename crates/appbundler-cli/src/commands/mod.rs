mod bundle;
mod init;
mod resolve;

pub use bundle::{BundleOptions, bundle};
pub use init::init_project;
pub use resolve::resolve;
