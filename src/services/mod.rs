//! # Business Logic Services
//!
//! ## Available Services
//!
//! - **Codec** (`codec`) - JPEG/PNG/GIF detection, decoding and encoding
//! - **JWT** (`jwt`) - Access token issuing and validation
//! - **Storage** (`storage`) - Per-upload identifiers and directory layout
//! - **Thumbnail** (`thumbnail`) - Letterboxed nearest-neighbour thumbnails
//! - **Upload** (`upload`) - The end-to-end upload pipeline

pub mod codec;
pub mod jwt;
pub mod storage;
pub mod thumbnail;
pub mod upload;
