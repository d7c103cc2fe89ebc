mod yeastar_client;

pub use yeastar_client::YeastarClient;
