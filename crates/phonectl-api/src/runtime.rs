use std::sync::Arc;

use async_trait::async_trait;

use phonectl_core::planner::{PlanInput, Planner, RulePlanner};
use phonectl_core::recorder::{StatusRecorder, StatusReport};
use phonectl_core::store::{CommandStore, PairingStore, StatusStore};
use phonectl_core::types::Pairing;
use phonectl_stores::{InMemoryCommandStore, InMemoryPairingStore, InMemoryStatusStore};

use crate::dto::{
    CommandView, PairAck, PairDeviceRequest, PairingView, PlanCommandRequest, PullActionsRequest,
    PulledActionView, RecordStatusRequest, StatusAck, StatusEventView,
};
use crate::{ApiError, ApiService};

/// Actions handed out per pull when the caller does not say otherwise
pub const DEFAULT_PULL_LIMIT: usize = 10;

/// AgentApi - wires the planner, the stores, and the recorder into the
/// service surface. Construct via [`AgentApiBuilder`].
pub struct AgentApi {
    planner: Arc<dyn Planner>,
    commands: Arc<dyn CommandStore>,
    pairings: Arc<dyn PairingStore>,
    statuses: Arc<dyn StatusStore>,
    recorder: StatusRecorder,
    default_pull_limit: usize,
}

/// Builder with in-memory defaults for every component
pub struct AgentApiBuilder {
    planner: Arc<dyn Planner>,
    commands: Arc<dyn CommandStore>,
    pairings: Arc<dyn PairingStore>,
    statuses: Arc<dyn StatusStore>,
    default_pull_limit: usize,
}

impl Default for AgentApiBuilder {
    fn default() -> Self {
        Self {
            planner: Arc::new(RulePlanner::new()),
            commands: Arc::new(InMemoryCommandStore::new()),
            pairings: Arc::new(InMemoryPairingStore::new()),
            statuses: Arc::new(InMemoryStatusStore::new()),
            default_pull_limit: DEFAULT_PULL_LIMIT,
        }
    }
}

impl AgentApiBuilder {
    /// Start from in-memory defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the planner implementation
    pub fn with_planner(mut self, planner: Arc<dyn Planner>) -> Self {
        self.planner = planner;
        self
    }

    /// Swap the command store
    pub fn with_command_store(mut self, commands: Arc<dyn CommandStore>) -> Self {
        self.commands = commands;
        self
    }

    /// Swap the pairing store
    pub fn with_pairing_store(mut self, pairings: Arc<dyn PairingStore>) -> Self {
        self.pairings = pairings;
        self
    }

    /// Swap the status store
    pub fn with_status_store(mut self, statuses: Arc<dyn StatusStore>) -> Self {
        self.statuses = statuses;
        self
    }

    /// Override the default pull limit
    pub fn with_default_pull_limit(mut self, limit: usize) -> Self {
        self.default_pull_limit = limit;
        self
    }

    /// Build the API
    pub fn build(self) -> AgentApi {
        let recorder = StatusRecorder::new(self.commands.clone(), self.statuses.clone());
        AgentApi {
            planner: self.planner,
            commands: self.commands,
            pairings: self.pairings,
            statuses: self.statuses,
            recorder,
            default_pull_limit: self.default_pull_limit,
        }
    }
}

impl AgentApi {
    fn require_device_id(device_id: &str) -> Result<(), ApiError> {
        if device_id.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "device_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ApiService for AgentApi {
    async fn pair_device(&self, request: PairDeviceRequest) -> Result<PairAck, ApiError> {
        Self::require_device_id(&request.device_id)?;
        let pairing = Pairing::new(request.device_id.clone(), request.device_name);
        self.pairings.save(&pairing).await?;
        tracing::info!(device_id = %pairing.device_id, "device paired");
        Ok(PairAck {
            pairing_id: pairing.id,
            device_id: pairing.device_id,
            acknowledged: true,
        })
    }

    async fn list_pairings(&self) -> Result<Vec<PairingView>, ApiError> {
        let pairings = self.pairings.list().await?;
        Ok(pairings.into_iter().map(PairingView::from).collect())
    }

    async fn plan_command(&self, request: PlanCommandRequest) -> Result<CommandView, ApiError> {
        if request.text.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "text must not be empty".to_string(),
            ));
        }

        let input = PlanInput {
            text: request.text,
            language: request.language,
            device_id: request.device_id,
        };
        let command = self.planner.plan(&input).await?;
        self.commands.save(&command).await?;
        tracing::info!(
            command_id = %command.id,
            intent = %command.intent,
            actions = command.actions.len(),
            device_id = command.device_id.as_deref().unwrap_or("-"),
            "command planned"
        );
        Ok(CommandView::from(command))
    }

    async fn pull_actions(
        &self,
        request: PullActionsRequest,
    ) -> Result<Vec<PulledActionView>, ApiError> {
        Self::require_device_id(&request.device_id)?;
        let limit = request.limit.unwrap_or(self.default_pull_limit);
        if limit == 0 {
            return Err(ApiError::InvalidArgument("limit must be >= 1".to_string()));
        }

        let pulled = self.commands.claim_pending(&request.device_id, limit).await?;
        tracing::debug!(
            device_id = %request.device_id,
            count = pulled.len(),
            "actions pulled"
        );
        Ok(pulled.into_iter().map(PulledActionView::from).collect())
    }

    async fn record_status(&self, request: RecordStatusRequest) -> Result<StatusAck, ApiError> {
        Self::require_device_id(&request.device_id)?;
        self.recorder
            .record(StatusReport {
                device_id: request.device_id,
                command_id: request.command_id,
                action_index: request.action_index,
                status: request.status,
                error: request.error,
            })
            .await?;
        Ok(StatusAck { ok: true })
    }

    async fn device_status(&self, device_id: &str) -> Result<Vec<StatusEventView>, ApiError> {
        Self::require_device_id(device_id)?;
        let events = self.statuses.list_for_device(device_id).await?;
        Ok(events.into_iter().map(StatusEventView::from).collect())
    }

    async fn history(&self) -> Result<Vec<CommandView>, ApiError> {
        let commands = self.commands.list_all().await?;
        Ok(commands.into_iter().map(CommandView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use phonectl_core::types::{ActionStatus, CommandStatus, Intent};

    fn api() -> AgentApi {
        AgentApiBuilder::new().build()
    }

    fn plan_request(text: &str, device_id: &str) -> PlanCommandRequest {
        PlanCommandRequest {
            text: text.to_string(),
            language: None,
            device_id: Some(device_id.to_string()),
        }
    }

    fn pull_request(device_id: &str, limit: Option<usize>) -> PullActionsRequest {
        PullActionsRequest {
            device_id: device_id.to_string(),
            limit,
        }
    }

    #[tokio::test]
    async fn test_plan_persists_and_appears_in_history() {
        let api = api();
        let planned = api
            .plan_command(plan_request("call to Rahim", "d1"))
            .await
            .unwrap();
        assert_eq!(planned.intent, Intent::CallContact);
        assert_eq!(planned.status, CommandStatus::Planned);

        let history = api.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, planned.id);
        assert_eq!(history[0].text, "call to Rahim");
    }

    #[tokio::test]
    async fn test_plan_rejects_empty_text() {
        let api = api();
        let err = api
            .plan_command(plan_request("   ", "d1"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_pull_limits_and_claims_from_newest() {
        let api = api();
        api.plan_command(plan_request("call to Rahim", "d1"))
            .await
            .unwrap();
        let newest = api
            .plan_command(plan_request("send sms to Karim", "d1"))
            .await
            .unwrap();

        let pulled = api.pull_actions(pull_request("d1", Some(2))).await.unwrap();
        assert_eq!(pulled.len(), 2);
        assert!(pulled.iter().all(|p| p.command_id == newest.id));
        assert_eq!(pulled[0].action_index, 0);
        assert_eq!(pulled[1].action_index, 1);
        assert!(pulled
            .iter()
            .all(|p| p.action.status == ActionStatus::Sent));
    }

    #[tokio::test]
    async fn test_pull_default_limit_applies() {
        let api = AgentApiBuilder::new().with_default_pull_limit(3).build();
        api.plan_command(plan_request("send sms to Karim", "d1"))
            .await
            .unwrap();
        let pulled = api.pull_actions(pull_request("d1", None)).await.unwrap();
        assert_eq!(pulled.len(), 3);
    }

    #[tokio::test]
    async fn test_pull_rejects_zero_limit_and_empty_device() {
        let api = api();
        let err = api
            .pull_actions(pull_request("d1", Some(0)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = api.pull_actions(pull_request("", None)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_status_flow_reconciles_command() {
        let api = api();
        let planned = api
            .plan_command(plan_request("bluetooth on", "d1"))
            .await
            .unwrap();
        let total = planned.actions.len();

        for index in 0..total {
            api.record_status(RecordStatusRequest {
                device_id: "d1".to_string(),
                action_index: index,
                command_id: Some(planned.id.clone()),
                status: ActionStatus::Executed,
                error: None,
            })
            .await
            .unwrap();
        }

        let history = api.history().await.unwrap();
        assert_eq!(history[0].status, CommandStatus::Completed);
        assert!(history[0]
            .actions
            .iter()
            .all(|a| a.status == ActionStatus::Executed));

        // Nothing left to deliver.
        let pulled = api.pull_actions(pull_request("d1", None)).await.unwrap();
        assert!(pulled.is_empty());
    }

    #[tokio::test]
    async fn test_failed_action_fails_command_and_keeps_error() {
        let api = api();
        let planned = api
            .plan_command(plan_request("wifi off", "d1"))
            .await
            .unwrap();

        api.record_status(RecordStatusRequest {
            device_id: "d1".to_string(),
            action_index: 1,
            command_id: Some(planned.id.clone()),
            status: ActionStatus::Failed,
            error: Some("settings page not found".to_string()),
        })
        .await
        .unwrap();

        let history = api.history().await.unwrap();
        assert_eq!(history[0].status, CommandStatus::Failed);
        assert_eq!(
            history[0].actions[1].error.as_deref(),
            Some("settings page not found")
        );
    }

    #[tokio::test]
    async fn test_status_regression_is_conflict() {
        let api = api();
        let planned = api
            .plan_command(plan_request("bluetooth on", "d1"))
            .await
            .unwrap();

        api.record_status(RecordStatusRequest {
            device_id: "d1".to_string(),
            action_index: 0,
            command_id: Some(planned.id.clone()),
            status: ActionStatus::Executed,
            error: None,
        })
        .await
        .unwrap();

        let err = api
            .record_status(RecordStatusRequest {
                device_id: "d1".to_string(),
                action_index: 0,
                command_id: Some(planned.id.clone()),
                status: ActionStatus::Pending,
                error: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn test_status_rereport_is_accepted() {
        let api = api();
        let planned = api
            .plan_command(plan_request("bluetooth on", "d1"))
            .await
            .unwrap();
        let report = RecordStatusRequest {
            device_id: "d1".to_string(),
            action_index: 0,
            command_id: Some(planned.id.clone()),
            status: ActionStatus::Executed,
            error: None,
        };

        api.record_status(report.clone()).await.unwrap();
        let ack = api.record_status(report).await.unwrap();
        assert!(ack.ok);
    }

    #[tokio::test]
    async fn test_status_out_of_range_index_rejected() {
        let api = api();
        let planned = api
            .plan_command(plan_request("bluetooth on", "d1"))
            .await
            .unwrap();

        let err = api
            .record_status(RecordStatusRequest {
                device_id: "d1".to_string(),
                action_index: 99,
                command_id: Some(planned.id),
                status: ActionStatus::Executed,
                error: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_status_unknown_command_is_not_found() {
        let api = api();
        let err = api
            .record_status(RecordStatusRequest {
                device_id: "d1".to_string(),
                action_index: 0,
                command_id: Some("missing".to_string()),
                status: ActionStatus::Executed,
                error: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_status_without_command_id_is_log_only() {
        let api = api();
        let ack = api
            .record_status(RecordStatusRequest {
                device_id: "d1".to_string(),
                action_index: 0,
                command_id: None,
                status: ActionStatus::Executed,
                error: None,
            })
            .await
            .unwrap();
        assert!(ack.ok);
        assert!(api.history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_device_status_filters_by_device_in_append_order() {
        let api = api();
        for (device, index, status) in [
            ("d1", 0, ActionStatus::Sent),
            ("d2", 0, ActionStatus::Executed),
            ("d1", 1, ActionStatus::Executed),
        ] {
            api.record_status(RecordStatusRequest {
                device_id: device.to_string(),
                action_index: index,
                command_id: None,
                status,
                error: None,
            })
            .await
            .unwrap();
        }

        let events = api.device_status("d1").await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.device_id == "d1"));
        assert_eq!(events[0].action_index, 0);
        assert_eq!(events[0].status, ActionStatus::Sent);
        assert_eq!(events[1].action_index, 1);
        assert_eq!(events[1].status, ActionStatus::Executed);

        let err = api.device_status("  ").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[tokio::test]
    async fn test_pairing_roundtrip() {
        let api = api();
        let ack = api
            .pair_device(PairDeviceRequest {
                device_id: "d1".to_string(),
                device_name: Some("Pixel".to_string()),
            })
            .await
            .unwrap();
        assert!(ack.acknowledged);

        let pairings = api.list_pairings().await.unwrap();
        assert_eq!(pairings.len(), 1);
        assert_eq!(pairings[0].device_id, "d1");
        assert_eq!(pairings[0].device_name.as_deref(), Some("Pixel"));

        let err = api
            .pair_device(PairDeviceRequest {
                device_id: "  ".to_string(),
                device_name: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }
}
