pub mod app;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod forecast;
pub mod handlers;
pub mod models;
pub mod poller;
pub mod remote;
pub mod state;
pub mod store;
pub mod sync;
pub mod trend;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::{Settings, SyncSettings};
pub use remote::{HttpRemote, RemoteApi};
pub use state::AppState;
pub use sync::{SyncOrchestrator, View};
