//! Service layer for business logic.
//!
//! Services sit between the HTTP layer and the collaborator traits. They
//! validate caller input and shape results; they never own state.

pub mod paths;

pub use paths::{
    keywords_for, list_paths, process_path, FieldError, PathError, PathListing, PathOutput,
    PathPart, PathRequest, PathResult, ResolvedPath, NO_KWARGS_WARNING,
};
