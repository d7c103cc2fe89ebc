mod audio_normalizer;
mod cdr_gateway;
mod clock;
mod credential_store;
mod llm_client;
mod token_issuer;
mod transcription_engine;

pub use audio_normalizer::{AudioConversionError, AudioNormalizer};
pub use cdr_gateway::{CdrGateway, UpstreamQueryError};
pub use clock::{Clock, SystemClock};
pub use credential_store::{CredentialStore, StoreError};
pub use llm_client::{LlmClient, LlmClientError};
pub use token_issuer::{TokenIssuer, TokenRefreshError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
