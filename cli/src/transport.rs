//! Blocking HTTP transport backed by ureq.

use octofit_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};

/// Executes requests with a shared ureq agent.
///
/// ureq's status-code-as-error behavior is disabled so 4xx/5xx responses
/// come back as data and the core client interprets them.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.path.as_str();
        let accept = request.header("accept").unwrap_or("application/json");
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => self.agent.get(url).header("accept", accept).call(),
            (HttpMethod::Delete, _) => self.agent.delete(url).header("accept", accept).call(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(url)
                .header("accept", accept)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(url).header("accept", accept).send_empty(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(url)
                .header("accept", accept)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(url).header("accept", accept).send_empty(),
            (HttpMethod::Patch, Some(body)) => self
                .agent
                .patch(url)
                .header("accept", accept)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Patch, None) => {
                self.agent.patch(url).header("accept", accept).send_empty()
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use octofit_core::{Api, OctofitClient};

    #[test]
    fn connection_refused_is_a_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let api = Api::new(
            OctofitClient::new(&format!("http://{addr}/api")),
            UreqTransport::new(),
        );
        let err = api.my_profile().unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
