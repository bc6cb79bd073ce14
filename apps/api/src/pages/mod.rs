pub mod defaults;
pub mod handlers;
