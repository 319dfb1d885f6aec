pub mod forest;

pub use forest::{attach_employees, build_team_forest, Forest, TeamNode};
