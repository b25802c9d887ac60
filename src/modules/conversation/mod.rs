pub mod controller;
pub mod crud;
pub mod model;
pub mod parser;
pub mod routes;
pub mod schema;
