//! Remote task API adapter.

mod store;
mod transport;

pub use store::HttpTaskStore;
#[cfg(test)]
pub use transport::MockHttpTransport;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
