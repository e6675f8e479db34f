// Don't change this value, it will be replaced by the commit build time
pub static COMMIT_BUILD: &str = "20261016000000";

// Don't change this value, it will be replaced by the version
pub static VERSION: &str = "0.1.0 - Dev";

pub mod app;
pub mod conf;
pub mod erx;
pub mod log;
pub mod model;
pub mod pagination;
pub mod service;
pub mod tools;

pub mod web;
