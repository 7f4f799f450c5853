pub mod generator;
pub mod image_tasks;
pub mod mock;
pub mod schema;
pub mod session_flow;
