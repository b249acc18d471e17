pub mod dispatcher;
pub mod request;

pub use dispatcher::RequestDispatcher;
pub use request::RequestSpec;
