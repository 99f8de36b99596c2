//! The three backend variants. Each contributes a [`BackendProfile`] and a
//! constructor wiring its transport to a [`ModelBackend`].
//!
//! [`BackendProfile`]: crate::BackendProfile
//! [`ModelBackend`]: crate::ModelBackend
pub mod groq;
pub mod local;
pub mod openai;
