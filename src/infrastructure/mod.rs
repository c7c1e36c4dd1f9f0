//! Infrastructure layer - storage, authentication and service implementations

pub mod auth;
pub mod event;
pub mod logging;
pub mod storage;
pub mod user;
