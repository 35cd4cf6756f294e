pub mod lead_queries;
pub mod pool_queries;
