//! HTTP wrapper for the CareLink REST API.
//!
//! One shared reqwest client with a bounded per-request timeout. The
//! bearer token is read from the session store on every request. Failed
//! GETs are retried exactly once after a fixed delay; writes are never
//! auto-retried. A 401 clears the session; a 403 is logged and never
//! surfaced to the user.

use crate::errors::ClientError;
use crate::handlers::notifications::{NoticeDraft, NotificationStore};
use crate::handlers::session::SessionStore;
use crate::models::all_models::NoticeKind;
use lazy_static::lazy_static;
use log::{error, info, warn};
use reqwest::{header, Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const GET_RETRY_DELAY: Duration = Duration::from_secs(1);
/// At most one connectivity-failure toast (timeout or transport) per this
/// interval, process-wide, so a sustained outage or a retried request does
/// not storm the feed.
pub const NETWORK_NOTICE_INTERVAL: Duration = Duration::from_secs(10);

lazy_static! {
    static ref LAST_NETWORK_NOTICE: Mutex<Option<Instant>> = Mutex::new(None);
}

fn allow_rate_limited_notice(last: &Mutex<Option<Instant>>, interval: Duration) -> bool {
    let mut last = last.lock().unwrap();
    match *last {
        Some(at) if at.elapsed() < interval => false,
        _ => {
            *last = Some(Instant::now());
            true
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    pub(crate) session: SessionStore,
    pub(crate) notifications: NotificationStore,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore,
        notifications: NotificationStore,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
            notifications,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.session.token() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    /// GET with the single fixed-delay retry. Authentication and
    /// authorization rejections are not retried; nothing would change.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        match self.send(self.request(Method::GET, path)).await {
            Err(ClientError::SessionExpired) => Err(ClientError::SessionExpired),
            Err(ClientError::Forbidden) => Err(ClientError::Forbidden),
            Err(first) => {
                info!("GET {} failed ({}), retrying once", path, first);
                tokio::time::sleep(GET_RETRY_DELAY).await;
                self.send(self.request(Method::GET, path)).await
            }
            ok => ok,
        }
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    /// PUT with no payload, for flag-flip endpoints like approval.
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::PUT, path)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.send(self.request(Method::DELETE, path)).await
    }

    /// Unauthenticated POST for the auth endpoints themselves. A 401 here
    /// means bad credentials, not an expired session, so the session
    /// policy below must not run.
    pub async fn post_public<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = match self.http.post(url).json(body).send().await {
            Ok(response) => response,
            Err(e) => return Err(self.transport_error(path, e)),
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let path = e.url().map(|u| u.path().to_string()).unwrap_or_default();
                return Err(self.transport_error(&path, e));
            }
        };

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                if let Err(e) = self.session.force_logout() {
                    error!("Failed to clear session after 401: {}", e);
                }
                Err(ClientError::SessionExpired)
            }
            // Logged for developers only. Surfacing it would leak that the
            // resource exists.
            StatusCode::FORBIDDEN => {
                warn!("403 from API: {:?}", response.url().path());
                Err(ClientError::Forbidden)
            }
            status if status.is_success() => Ok(response.json::<T>().await?),
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    // Both failure kinds share one limiter, so a timed-out GET plus its
    // retry still yields a single toast.
    fn transport_error(&self, path: &str, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            warn!("Request to {} timed out after {:?}", path, REQUEST_TIMEOUT);
            if self.should_emit_network_notice() {
                self.notifications.add(NoticeDraft::new(
                    NoticeKind::Error,
                    "Request timed out",
                    "The request timed out. Please check your connection and try again.",
                ));
            }
            return ClientError::Timeout;
        }

        error!("Network error on {}: {}", path, e);
        if self.should_emit_network_notice() {
            self.notifications.add(NoticeDraft::new(
                NoticeKind::Error,
                "Connection problem",
                "Could not reach the server. Please try again.",
            ));
        }
        ClientError::Network(e)
    }

    fn should_emit_network_notice(&self) -> bool {
        allow_rate_limited_notice(&LAST_NETWORK_NOTICE, NETWORK_NOTICE_INTERVAL)
    }
}
