mod channel;
mod worker;

pub use channel::{ApiRequest, ApiResult};
pub use worker::ApiWorker;
