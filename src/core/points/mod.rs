// Points module - per-user balances and the leaderboard.

mod points_service;

pub use points_service::{PointsService, LEADERBOARD_SIZE};
