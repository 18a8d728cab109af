//! Report Core - Join / Classify / Aggregate Engine
//!
//! Both reports are built from the same stages, applied to flat records
//! converted from full store snapshots.
//!
//! # Architecture
//!
//! ```text
//! logs store ──┐                       ┌── authors store
//!   (logs)     │  tokio::try_join!     │  (users, post)
//!              └──────────┬────────────┘
//!                         ↓
//! RelationalJoiner (key equality, collision suffixes)
//!     ↓
//! PredicateFilter / classifier (event + space codes → SemanticEvent)
//!     ↓
//! Aggregator (group-by + named counters)
//!     ↓
//! AllZeroFilter → IdentityFilter → report rows
//! ```

pub mod aggregator;
pub mod classifier;
pub mod filter;
pub mod joiner;
pub mod record;
pub mod service;

pub use aggregator::{Aggregator, Counter, Group, Predicate};
pub use classifier::{classify, Classification, SemanticEvent, SpaceKind};
pub use filter::{AllZeroFilter, IdentityFilter, PredicateFilter};
pub use joiner::RelationalJoiner;
pub use record::{Fields, KeyValue, Record, Value};
pub use service::{ActivityReportRow, CommentReportRow, ReportError, ReportService};
