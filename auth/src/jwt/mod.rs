pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Claims;
pub use codec::SigningKey;
pub use codec::TokenCodec;
pub use errors::KeyError;
pub use errors::TokenError;
