pub mod demo;
pub mod routes;
pub mod run;
