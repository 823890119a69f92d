//! Gateway action client
//!
//! One POST per action against `{base_url}/{action}` with an optional
//! bearer token. Calls fail fast: a timeout or transport failure surfaces
//! as a `TransportError` for the calling plugin to handle, and the client
//! never retries on its own.

use serde_json::{json, Value};

use crate::core::config::GatewaySection;
use crate::core::version;
use crate::gateway::error::{TransportError, TransportResult};
use crate::gateway::types::{ActionAck, MessageTarget};

pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl GatewayClient {
    pub fn new(config: &GatewaySection) -> TransportResult<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(version::user_agent());

        if !config.token.is_empty() {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = format!("Bearer {}", config.token);
            let mut header = reqwest::header::HeaderValue::from_str(&value)
                .map_err(|e| TransportError::MalformedResponse {
                    message: format!("invalid gateway token: {}", e),
                })?;
            header.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, header);
            builder = builder.default_headers(headers);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Invoke a gateway action and return its acknowledgment.
    ///
    /// A `status: failed` ack maps to `TransportError::ActionFailed` so
    /// callers handle gateway-level rejection the same way as transport
    /// failure.
    pub async fn call(&self, action: &str, params: Value) -> TransportResult<ActionAck> {
        let url = format!("{}/{}", self.base_url, action);
        log::debug!("gateway call: {} {}", action, params);

        let response = self
            .http
            .post(&url)
            .json(&params)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let ack: ActionAck =
            response
                .json()
                .await
                .map_err(|e| TransportError::MalformedResponse {
                    message: e.to_string(),
                })?;

        if !ack.is_ok() {
            return Err(TransportError::ActionFailed {
                action: action.to_string(),
                message: ack.failure_message(),
            });
        }

        log::debug!("gateway call ok: {} (retcode {})", action, ack.retcode);
        Ok(ack)
    }

    /// Send a text message to a group or a private chat.
    pub async fn send_msg(&self, target: MessageTarget, text: &str) -> TransportResult<ActionAck> {
        let params = match target {
            MessageTarget::Group(group_id) => json!({
                "message_type": "group",
                "group_id": group_id,
                "message": text,
            }),
            MessageTarget::Private(user_id) => json!({
                "message_type": "private",
                "user_id": user_id,
                "message": text,
            }),
        };
        self.call("send_msg", params).await
    }

    pub async fn send_group_msg(&self, group_id: i64, text: &str) -> TransportResult<ActionAck> {
        self.send_msg(MessageTarget::Group(group_id), text).await
    }

    pub async fn send_private_msg(&self, user_id: i64, text: &str) -> TransportResult<ActionAck> {
        self.send_msg(MessageTarget::Private(user_id), text).await
    }

    /// Remove a member from a group.
    pub async fn set_group_kick(
        &self,
        group_id: i64,
        user_id: i64,
        reject_add_request: bool,
    ) -> TransportResult<ActionAck> {
        self.call(
            "set_group_kick",
            json!({
                "group_id": group_id,
                "user_id": user_id,
                "reject_add_request": reject_add_request,
            }),
        )
        .await
    }

    /// Mute a member for `duration_secs` seconds; zero lifts the mute.
    pub async fn set_group_ban(
        &self,
        group_id: i64,
        user_id: i64,
        duration_secs: u64,
    ) -> TransportResult<ActionAck> {
        self.call(
            "set_group_ban",
            json!({
                "group_id": group_id,
                "user_id": user_id,
                "duration": duration_secs,
            }),
        )
        .await
    }

    pub async fn get_group_member_info(
        &self,
        group_id: i64,
        user_id: i64,
    ) -> TransportResult<ActionAck> {
        self.call(
            "get_group_member_info",
            json!({
                "group_id": group_id,
                "user_id": user_id,
            }),
        )
        .await
    }
}

fn map_send_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Http(error)
    }
}
