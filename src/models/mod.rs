pub mod api_response;
pub mod dto;

pub use api_response::{ApiResponse, ErrorBody};
pub use dto::{Credentials, CustomerLogQuery, CustomerLogType, ExternalToken, PullSkuRequest};
