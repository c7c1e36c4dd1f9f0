//! Authentication infrastructure module
//!
//! This module provides JWT access/refresh token management.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService, TokenPair, TokenType};
