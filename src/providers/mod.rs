pub mod compatible;
pub mod factory;
pub mod scrub;
pub mod traits;

pub use compatible::OpenAiCompatibleProvider;
pub use factory::{create_provider, resolve_api_key};
pub use scrub::{api_error, sanitize_api_error, scrub_secret_patterns};
pub use traits::Provider;
