//! Translation gate and progress registry: the concurrency core. At
//! most one translation job holds the gate at a time; everything else
//! (interactive downloads, ad-hoc content translation, batch videos)
//! queues behind it in FIFO order.

mod registry;
mod types;

pub use registry::{JobGuard, ProgressRegistry};
pub use types::{JobStatus, TranslationJob};
