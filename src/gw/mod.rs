//! Guild Wars domain tables and raw catalog records
//!
//! The profession and tag tables are closed, externally defined vocabularies:
//! the search core resolves user tokens against them but never extends them.

pub mod build;
pub mod profession;
pub mod tags;

pub use build::{Build, BuildMember, BuildSource};
pub use profession::Profession;
pub use tags::{TagDef, TagTable};
