pub mod credentials;

pub use credentials::{Credentials, Secret};
