//! # Utility Modules
//!
//! ## Available Utilities
//!
//! - **Constants** (`constant`) - Size limits, thumbnail geometry and layout names
//! - **File** (`file`) - Async file system helpers
//! - **Id** (`id`) - Injected identifier generation
//! - **Upload** (`upload`) - Upload form types and validation
//! - **Validators** (`validator`) - User id and filename checks

pub mod constant;
pub mod file;
pub mod id;
pub mod upload;
pub mod validator;
