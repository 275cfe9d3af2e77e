mod dto;
mod error;
mod runtime;
mod service;

pub use dto::{
    CommandView, PairAck, PairDeviceRequest, PairingView, PlanCommandRequest, PullActionsRequest,
    PulledActionView, RecordStatusRequest, StatusAck, StatusEventView,
};
pub use error::{ApiError, ErrorCode};
pub use runtime::{AgentApi, AgentApiBuilder, DEFAULT_PULL_LIMIT};
pub use service::ApiService;
