//! Small cross-cutting helpers: validation-issue collection.

pub mod validation;
