use async_trait::async_trait;

use crate::{
    ApiError, CommandView, PairAck, PairDeviceRequest, PairingView, PlanCommandRequest,
    PullActionsRequest, PulledActionView, RecordStatusRequest, StatusAck, StatusEventView,
};

#[async_trait]
pub trait ApiService: Send + Sync {
    async fn pair_device(&self, request: PairDeviceRequest) -> Result<PairAck, ApiError>;
    async fn list_pairings(&self) -> Result<Vec<PairingView>, ApiError>;
    async fn plan_command(&self, request: PlanCommandRequest) -> Result<CommandView, ApiError>;
    async fn pull_actions(
        &self,
        request: PullActionsRequest,
    ) -> Result<Vec<PulledActionView>, ApiError>;
    async fn record_status(&self, request: RecordStatusRequest) -> Result<StatusAck, ApiError>;
    async fn device_status(&self, device_id: &str) -> Result<Vec<StatusEventView>, ApiError>;
    async fn history(&self) -> Result<Vec<CommandView>, ApiError>;
}
