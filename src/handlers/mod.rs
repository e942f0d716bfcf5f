pub mod context;
pub mod discovery;
