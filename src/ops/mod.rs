pub mod board_ops;
pub mod lead_ops;
pub mod user_ops;
