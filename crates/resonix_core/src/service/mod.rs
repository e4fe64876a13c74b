//! Use-case services behind the public and admin APIs.
//!
//! # Responsibility
//! - Turn request parameters into repository calls and response shapes.
//! - Map storage and auth failures into one service error type.
//!
//! # Invariants
//! - Public listings never expose unpublished projects, news, or blog posts,
//!   nor inactive members.
//! - Every successful admin mutation is recorded in the activity log.

use crate::auth::AuthError;
use crate::model::record::{Topic, ValidationError};
use crate::repo::record_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity;
pub mod admin_service;
pub mod content_service;
pub mod pagination;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    /// Missing, non-numeric, or non-positive id parameter.
    InvalidId(Topic),
    NotFound { label: &'static str },
    Validation(ValidationError),
    /// Request payload could not be interpreted.
    InvalidInput(String),
    Auth(AuthError),
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(topic) => write!(f, "Invalid {} ID", topic.id_noun()),
            Self::NotFound { label } => write!(f, "{label} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { label, .. } => Self::NotFound { label },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}
