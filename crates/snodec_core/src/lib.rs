//! Public library API for decoding SNO game-data records and TOC catalogs.

/// Cursor, type registry, value decoding, catalog parsing, walk and hashing.
pub mod sno;
