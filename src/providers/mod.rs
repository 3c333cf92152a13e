pub mod goldapi;

pub use goldapi::GoldApiClient;
