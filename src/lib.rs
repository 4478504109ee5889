pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod operator;
pub mod orchestration;
pub mod session;
pub mod video;

pub use config::Config;
pub use db::{init_db, InMemoryStore, MatchStore, Repository};
pub use domain::{
    Action, ActionDraft, ActionType, Fight, FightId, FighterColor, FighterId, Round, Seconds,
    Technique, VictoryDecision,
};
pub use error::AppError;
pub use orchestration::MatchService;
pub use session::MatchSession;
