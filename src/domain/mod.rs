mod analysis_report;
mod call_detail_query;
mod call_recording;
mod credential_record;
mod normalized_audio;
mod pipeline_stage;
mod transcript;

pub use analysis_report::AnalysisReport;
pub use call_detail_query::{CallDetailQuery, CallDirection, InvalidRangeError};
pub use call_recording::CallRecording;
pub use credential_record::{CredentialRecord, LifetimeOutOfRange, TokenGrant, ValidToken};
pub use normalized_audio::NormalizedAudio;
pub use pipeline_stage::{PipelineStage, PipelineState};
pub use transcript::Transcript;
