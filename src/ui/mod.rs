pub mod board;
pub mod pending;
pub mod transient;

pub use board::BoardState;
pub use pending::{PendingAction, PendingActions};
pub use transient::{Banner, BannerKind, Transient};
