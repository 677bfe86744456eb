use std::future::Future;

use reqwest::StatusCode;

use crate::exchange::{Request, Response};
use crate::logger::Logger;

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Runs request handlers with access logging and turns failures into a
/// logged 500 reply.
pub struct RequestService {
    pub logger: Logger,
}

impl RequestService {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    /// Returns whether the handler succeeded.
    pub async fn dispatch<'r, Q, S, F, Fut>(
        &mut self,
        signature: &str,
        req: &'r Q,
        res: &mut S,
        handler: F,
    ) -> bool
    where
        Q: Request + ?Sized,
        S: Response + ?Sized,
        F: FnOnce(&'r Q) -> Fut,
        Fut: Future<Output = Result<String, HandlerError>>,
    {
        self.logger.access(signature, req);

        match handler(req).await {
            Ok(body) => {
                res.send_status(StatusCode::OK, &body);
                true
            }
            Err(e) => {
                self.logger.errored_request(&*e, req);
                let mut fail = self.logger.internal_error(signature, res);
                fail(&e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::{RequestRecord, ResponseRecord};
    use crate::logger::INCIDENT_BODY;
    use serde_json::json;

    fn service() -> RequestService {
        RequestService::new(Logger::new().with_echo(std::io::sink()))
    }

    #[tokio::test]
    async fn successful_handler_replies_ok_and_logs_access() {
        let mut service = service();
        let req = RequestRecord::new("1.2.3.4").with_params(json!({"id": "9"}));
        let mut res = ResponseRecord::default();

        let ok = service
            .dispatch("item", &req, &mut res, |req| async move {
                Ok(format!("item {}", req.params.as_ref().unwrap()["id"]))
            })
            .await;

        assert!(ok);
        assert_eq!(res.status, Some(StatusCode::OK));
        assert_eq!(res.body.as_deref(), Some("item \"9\""));
        assert_eq!(service.logger.access_count(), 1);
        assert_eq!(service.logger.error_count(), 0);
    }

    #[tokio::test]
    async fn failing_handler_is_logged_and_answered_with_500() {
        let mut service = service();
        let req = RequestRecord::new("1.2.3.4")
            .with_params(json!({"id": "9"}))
            .with_body(json!({"qty": 2}));
        let mut res = ResponseRecord::default();

        let ok = service
            .dispatch("order", &req, &mut res, |_| async {
                Err::<String, HandlerError>("out of stock".into())
            })
            .await;

        assert!(!ok);
        assert_eq!(res.status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(res.body.as_deref(), Some(INCIDENT_BODY));
        // error chain, params, body, then the internal-error entry
        assert_eq!(service.logger.error_count(), 4);
        assert_eq!(service.logger.access_count(), 1);
    }
}
