pub mod audio;
pub mod llm;
pub mod observability;
pub mod persistence;
pub mod telephony;
