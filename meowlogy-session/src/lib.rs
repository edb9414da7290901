pub mod impls;
pub mod model;
pub mod store;

pub use model::credentials::DemoCredentials;
pub use model::session::Session;
pub use store::SessionStore;
