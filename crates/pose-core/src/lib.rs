//! Pose Editor Core Data Structures
//!
//! This crate contains the framework pieces the editor's tasks run on:
//! - Scene: node hierarchy, models, selection and bounding boxes
//! - Document/Session: persisted scenes and the active document/node
//! - EventHub: publish/subscribe with scoped registrations
//! - Input: pointer and wheel events routed from viewports
//! - Mesh: STL/OBJ import

pub mod constants;
pub mod document;
pub mod events;
pub mod input;
pub mod mesh;
pub mod primitive;
pub mod scene;
pub mod session;

pub use constants::*;
pub use document::*;
pub use events::*;
pub use input::*;
pub use mesh::*;
pub use primitive::*;
pub use scene::*;
pub use session::*;
