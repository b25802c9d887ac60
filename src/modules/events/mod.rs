pub mod broadcaster;
pub mod controller;
pub mod routes;
