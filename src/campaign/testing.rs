//! In-process `CampaignApi` double for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::campaign::client::CampaignApi;
use crate::campaign::credential::Credential;
use crate::campaign::types::MessageRequest;
use crate::error::AppError;

type DetailsFn = Box<dyn Fn(&str) -> Result<Value, AppError> + Send + Sync>;
type SendFn = Box<dyn Fn(&MessageRequest) -> Result<Value, AppError> + Send + Sync>;

pub(crate) struct FakeCampaignApi {
    details: DetailsFn,
    send: SendFn,
    pub detail_calls: Mutex<Vec<String>>,
    pub sent: Mutex<Vec<MessageRequest>>,
}

impl FakeCampaignApi {
    pub fn new() -> Self {
        Self {
            details: Box::new(|_| Err(AppError::Internal("no details configured".into()))),
            send: Box::new(|_| Ok(serde_json::json!({"success": true}))),
            detail_calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_details(
        mut self,
        f: impl Fn(&str) -> Result<Value, AppError> + Send + Sync + 'static,
    ) -> Self {
        self.details = Box::new(f);
        self
    }

    pub fn with_send(
        mut self,
        f: impl Fn(&MessageRequest) -> Result<Value, AppError> + Send + Sync + 'static,
    ) -> Self {
        self.send = Box::new(f);
        self
    }

    pub fn detail_call_count(&self) -> usize {
        self.detail_calls.lock().unwrap().len()
    }

    pub fn sent_requests(&self) -> Vec<MessageRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignApi for FakeCampaignApi {
    async fn campaign_details(
        &self,
        _credential: &Credential,
        campaign_name: &str,
    ) -> Result<Value, AppError> {
        self.detail_calls
            .lock()
            .unwrap()
            .push(campaign_name.to_string());
        (self.details)(campaign_name)
    }

    async fn send_campaign(&self, request: &MessageRequest) -> Result<Value, AppError> {
        self.sent.lock().unwrap().push(request.clone());
        (self.send)(request)
    }
}

pub(crate) fn credential() -> Credential {
    Credential::new("test-api-key").unwrap()
}
