pub mod api_server;
pub mod postgres;

pub use api_server::{start_api_server, start_api_server_with_shutdown};
pub use postgres::PostgresStore;
