pub mod adapters;
pub mod aggregation;
pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod ml;
pub mod selection;
pub mod stats;

pub use aggregation::aggregate_players;
pub use config::AppConfig;
pub use data::{DataSnapshot, SnapshotStore};
pub use domain::{MatchContext, MatchFormat, PlayerAggregate, PlayerRole, SelectedTeam};
pub use error::{PredictError, Result, SelectionError, XiError};
pub use ml::{HeuristicPredictor, ScorePredictor};
pub use selection::TeamSelector;
