pub mod fetch;
pub mod rotate;
