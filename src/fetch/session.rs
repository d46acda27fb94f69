use async_trait::async_trait;
use reqwest::header::{COOKIE, HeaderValue, USER_AGENT};

use super::client::HttpClient;

/// The portal only renders outlet pages for the WeChat in-app browser.
const WECHAT_UA: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/81.0.4044.138 Safari/537.36 NetType/WIFI \
    MicroMessenger/7.0.20.1781(0x6700143B) WindowsWechat(0x6307061d)";

/// An [`HttpClient`] wrapper that injects the portal session cookie and the
/// expected User-Agent on every request.
///
/// The session identity is fixed at construction and shared read-only by
/// every concurrent fetch in a run.
pub struct SessionHeaders<C> {
    inner: C,
    cookie: HeaderValue,
}

impl<C> SessionHeaders<C> {
    pub fn new(inner: C, session_id: &str) -> Self {
        let cookie = format!("JSESSIONID={session_id}")
            .parse()
            .expect("SessionHeaders: invalid session id");
        Self { inner, cookie }
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for SessionHeaders<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut().insert(COOKIE, self.cookie.clone());
        req.headers_mut()
            .insert(USER_AGENT, HeaderValue::from_static(WECHAT_UA));
        self.inner.execute(req).await
    }
}
