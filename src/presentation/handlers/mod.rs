mod analyze_call;
mod error;
mod health;
mod yeastar_calls;

pub use analyze_call::{AUDIO_FIELD, AnalyzeCallResponse, analyze_call_handler};
pub use error::{ApiError, ErrorResponse};
pub use health::{BANNER, health_handler, home_handler};
pub use yeastar_calls::{YeastarCallsParams, yeastar_calls_handler};
