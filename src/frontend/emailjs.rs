use gloo_net::http::Request;

use crate::config::EffectsConfig;
use crate::contact::{
    DeliveryError, EmailDelivery, EmailJsRequest, TemplateParams, EMAILJS_SEND_URL,
};

/// Sends contact messages through the EmailJS REST endpoint.
#[derive(Clone, Debug)]
pub struct EmailJsClient {
    service_id: String,
    template_id: String,
    public_key: String,
}

impl EmailJsClient {
    pub fn from_config(config: &EffectsConfig) -> Self {
        Self {
            service_id: config.emailjs_service_id.clone(),
            template_id: config.emailjs_template_id.clone(),
            public_key: config.emailjs_public_key.clone(),
        }
    }
}

impl EmailDelivery for EmailJsClient {
    async fn send(&self, params: &TemplateParams) -> Result<(), DeliveryError> {
        let body = EmailJsRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: params,
        };

        let response = Request::post(EMAILJS_SEND_URL)
            .json(&body)
            .map_err(|error| DeliveryError::Network(error.to_string()))?
            .send()
            .await
            .map_err(|error| DeliveryError::Network(error.to_string()))?;

        if response.ok() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected { status, body })
    }
}
