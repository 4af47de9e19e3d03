//! # pref-elicit
//!
//! Interactive preference elicitation for multi-objective optimization.
//!
//! At intervals during an optimization run the decision maker is consulted:
//! the candidate superset is refined, reference sets are built from it, a
//! human or an artificial decision maker answers them, and the answers are
//! appended to a chronologically ordered history that preference models are
//! rebuilt from.
//!
//! ## Core Concepts
//!
//! - **Preference models**: `LNorm`, `Pbi`, `PointLineProjection` and the
//!   judgment-counting `PreferenceCone`
//! - **History**: append-only, validated, digest-checked record of judgments
//! - **Refiner**: termination filters followed by superset reduction
//! - **Feedback**: scoped feedback sources behind a `FeedbackProvider`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pref_elicit::prelude::*;
//!
//! let hidden = LNorm::chebyshev(Some(vec![0.5, 0.5]));
//! let provider = FeedbackProvider::common(ArtificialValueDM::new(hidden))?;
//! let mut cycle = ElicitationCycle::new(
//!     Refiner::default(),
//!     provider,
//!     vec![DecisionMakingSystem::new("dm1")],
//! )?;
//!
//! let ctx = cycle
//!     .context_builder(10)
//!     .criteria(Criteria::all_cost(2))
//!     .alternatives(population)
//!     .build();
//! let report = cycle.run(&ctx, &reference_sets_constructor)?;
//! ```

pub mod alternative;
pub mod config;
pub mod context;
pub mod error;
pub mod feedback;
pub mod history;
pub mod model;
pub mod refiner;
pub mod statement;
pub mod system;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::alternative::prelude::*;
    pub use crate::config::*;
    pub use crate::context::*;
    pub use crate::error::*;
    pub use crate::feedback::prelude::*;
    pub use crate::history::prelude::*;
    pub use crate::model::prelude::*;
    pub use crate::refiner::prelude::*;
    pub use crate::statement::prelude::*;
    pub use crate::system::prelude::*;
}
