//! Live preview: debounce scheduling, the render step, its output sink and
//! the rendered layout

mod debounce;
mod pipeline;
mod sink;
mod view;

pub use debounce::{DebounceScheduler, DEFAULT_DEBOUNCE_MS};
pub use pipeline::{render_step, RenderOutcome};
pub use sink::{PreviewPane, PreviewSink};
