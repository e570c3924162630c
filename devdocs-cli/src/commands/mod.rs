//! CLI command implementations.

mod build;
mod init;
mod page;
mod routes;
mod serve;

pub use build::build_site;
pub use init::init_project;
pub use routes::list_routes;
pub use serve::serve_site;
