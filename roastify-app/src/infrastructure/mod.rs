pub mod db;
pub mod render;
pub mod security;
pub mod store;
