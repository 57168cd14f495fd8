//! Quest generation use cases.
//!
//! - `capability` - text generation handle with availability and timeout
//! - `extract` / `records` - raw model text to typed records
//! - `prompts` / `fallback` - what each stage asks for, and what it uses instead
//! - `pipeline` - the five stages plus graph repair
//! - `session` - streaming delivery of one pipeline run

pub mod capability;
pub mod extract;
pub mod fallback;
pub mod pipeline;
pub mod prompts;
pub mod records;
pub mod session;

pub use capability::{GenerationCapability, GenerationError};
pub use extract::{extract_json, ExtractError};
pub use pipeline::QuestPipeline;
pub use records::{filter_records, validate_records, QuestRecord, RawRecord};
pub use session::{QuestStreamer, SessionError};
