mod in_memory_credential_store;
mod json_file_credential_store;

pub use in_memory_credential_store::InMemoryCredentialStore;
pub use json_file_credential_store::JsonFileCredentialStore;
