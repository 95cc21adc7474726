//! Proxy Request - 入站请求到出站请求的转换

use bytes::Bytes;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST};
use http::{HeaderMap, Method, Uri};

/// 出站请求体
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyBody {
    /// 不携带请求体（GET / HEAD 或空请求体）
    Empty,
    /// JSON 以文本形式转发
    Text(String),
    /// multipart 与其他类型按原始字节转发，不重新编码
    Bytes(Bytes),
}

/// 待转发的请求，只存活一次调用
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    /// 原始路径（保持百分号编码）
    pub path: String,
    /// 原始查询串（不含 `?`）
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: ProxyBody,
}

impl ProxyRequest {
    /// 从入站请求的各部分构造
    ///
    /// 过滤 host / connection / content-length，它们由出站传输层重新计算
    pub fn from_parts(method: Method, uri: &Uri, headers: &HeaderMap, body: Bytes) -> Self {
        let mut forwarded = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers.iter() {
            if name == HOST || name == CONNECTION || name == CONTENT_LENGTH {
                continue;
            }
            forwarded.append(name.clone(), value.clone());
        }

        let body = classify_body(&method, headers, body);

        Self {
            method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            headers: forwarded,
            body,
        }
    }

    /// 路径 + 查询串
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// 是否不读取请求体的方法
    pub fn is_bodiless(method: &Method) -> bool {
        method == Method::GET || method == Method::HEAD
    }
}

fn classify_body(method: &Method, headers: &HeaderMap, body: Bytes) -> ProxyBody {
    if ProxyRequest::is_bodiless(method) || body.is_empty() {
        return ProxyBody::Empty;
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        return ProxyBody::Bytes(body);
    }

    if content_type.contains("application/json") {
        return match String::from_utf8(body.to_vec()) {
            Ok(text) => ProxyBody::Text(text),
            Err(_) => ProxyBody::Bytes(body),
        };
    }

    ProxyBody::Bytes(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_transport_headers_are_dropped() {
        let inbound = headers(&[
            ("host", "localhost:3000"),
            ("connection", "keep-alive"),
            ("content-length", "11"),
            ("cookie", "session=abc"),
            ("authorization", "Bearer t"),
            ("x-custom", "1"),
        ]);
        let uri: Uri = "/api/v1/podcasts".parse().unwrap();
        let request = ProxyRequest::from_parts(Method::POST, &uri, &inbound, Bytes::new());

        assert!(request.headers.get("host").is_none());
        assert!(request.headers.get("connection").is_none());
        assert!(request.headers.get("content-length").is_none());
        assert_eq!(request.headers.get("cookie").unwrap(), "session=abc");
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer t");
        assert_eq!(request.headers.get("x-custom").unwrap(), "1");
    }

    #[test]
    fn test_repeated_headers_are_kept() {
        let inbound = headers(&[("accept", "text/html"), ("accept", "application/json")]);
        let uri: Uri = "/api/v1/x".parse().unwrap();
        let request = ProxyRequest::from_parts(Method::GET, &uri, &inbound, Bytes::new());
        assert_eq!(request.headers.get_all("accept").iter().count(), 2);
    }

    #[test]
    fn test_raw_path_and_query_are_preserved() {
        let uri: Uri = "/api/v1/podcasts/tts-voices/openai%2Ftts-1?a=1&b=%20x".parse().unwrap();
        let request = ProxyRequest::from_parts(Method::GET, &uri, &HeaderMap::new(), Bytes::new());
        assert_eq!(request.path, "/api/v1/podcasts/tts-voices/openai%2Ftts-1");
        assert_eq!(request.query.as_deref(), Some("a=1&b=%20x"));
        assert_eq!(
            request.path_and_query(),
            "/api/v1/podcasts/tts-voices/openai%2Ftts-1?a=1&b=%20x"
        );
    }

    #[test]
    fn test_get_and_head_carry_no_body() {
        let uri: Uri = "/api/v1/x".parse().unwrap();
        let inbound = headers(&[("content-type", "application/json")]);
        for method in [Method::GET, Method::HEAD] {
            let request =
                ProxyRequest::from_parts(method, &uri, &inbound, Bytes::from_static(b"{}"));
            assert_eq!(request.body, ProxyBody::Empty);
        }
    }

    #[test]
    fn test_json_is_forwarded_as_text() {
        let uri: Uri = "/api/v1/x".parse().unwrap();
        let inbound = headers(&[("content-type", "application/json; charset=utf-8")]);
        let request = ProxyRequest::from_parts(
            Method::POST,
            &uri,
            &inbound,
            Bytes::from_static(br#"{"a":1}"#),
        );
        assert_eq!(request.body, ProxyBody::Text(r#"{"a":1}"#.to_string()));
    }

    #[test]
    fn test_multipart_is_forwarded_as_raw_bytes() {
        let uri: Uri = "/api/v1/podcasts/generate".parse().unwrap();
        let inbound = headers(&[("content-type", "multipart/form-data; boundary=XyZ")]);
        let raw = Bytes::from_static(b"--XyZ\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n--XyZ--\r\n");
        let request = ProxyRequest::from_parts(Method::POST, &uri, &inbound, raw.clone());
        assert_eq!(request.body, ProxyBody::Bytes(raw));
    }

    #[test]
    fn test_other_types_and_invalid_json_are_bytes() {
        let uri: Uri = "/api/v1/x".parse().unwrap();
        let form = headers(&[("content-type", "application/x-www-form-urlencoded")]);
        let request =
            ProxyRequest::from_parts(Method::PUT, &uri, &form, Bytes::from_static(b"a=1&b=2"));
        assert_eq!(request.body, ProxyBody::Bytes(Bytes::from_static(b"a=1&b=2")));

        let json = headers(&[("content-type", "application/json")]);
        let request =
            ProxyRequest::from_parts(Method::POST, &uri, &json, Bytes::from_static(&[0xff, 0xfe]));
        assert!(matches!(request.body, ProxyBody::Bytes(_)));
    }
}
