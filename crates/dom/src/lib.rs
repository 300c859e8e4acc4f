//! Arena DOM with block splitting
//!
//! An editable document is a list of block elements. Splitting a block at the
//! caret means building two new fragments: everything before a marker text
//! node and everything after it, with the formatting wrappers around the
//! marker reproduced on both sides.
//!
//! ## Philosophy
//!
//! - **Data structures first**: nodes live in one arena, identity is the index
//! - **No hidden state**: selection and hit-test caches are owned by callers
//! - **Fail loudly**: wrong node kinds are errors, never silent no-ops
//!
//! ## Core Design
//!
//! ```text
//! JSON / builders → DomArena (owned) → clone_tree → fragment → Serialized
//!                        ↓
//!                   NodeId (u32)
//! ```

pub mod arena;
pub mod check;
pub mod clone_tree;
pub mod error;
pub mod iterate;
pub mod range;
pub mod serializer;
pub mod service;
pub mod types;
pub mod utils;

pub use arena::DomArena;
pub use clone_tree::{clone_tree, has_meaningful_content, split_at, Split, SplitDirection};
pub use error::{DomError, Result};
pub use hit_test::{get_element_by_client_coordinates, HitTestCache, HitTestOptions, MousePoint};
pub use range::{BoundaryPoint, Range, Selection};
pub use serializer::{fragment_to_string, DomSerializer};
pub use service::DomService;
pub use types::*;
