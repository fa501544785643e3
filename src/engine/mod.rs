pub mod classifier;
pub mod error;
pub mod realtime;
pub mod recalc;
pub mod shift_resolver;
pub mod store;

pub use classifier::{classify, Derived, Punches};
pub use error::EngineError;
pub use realtime::FinalizationClock;
pub use recalc::{RecalcEngine, RecalcSummary};
pub use shift_resolver::{resolve_window, DayKind, ResolvedWindow};
