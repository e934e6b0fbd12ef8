#[macro_export]
/// Make a GET request expecting JSON.
/// if JSON deser fails, emit a `WARN` level tracing event
macro_rules! json_get {
    ($client:expr, $url:expr, $expected:ty,) => {
        $crate::json_get!($client, $url, $expected)
    };
    ($client:expr, $url:expr, $expected:ty) => {{
        let url: reqwest::Url = $url;
        tracing::debug!(url = url.as_str(), "Dispatching api request");
        let resp = $client.get(url.clone()).send().await?;
        let status = resp.status();
        match status.as_u16() {
            0..=399 => {}, // non-error codes
            422 => {}, // do nothing, these are handled later
            400.. => {
                tracing::debug!(url = url.as_str(), status = status.as_u16(), "Server error code");
                return Err($crate::client::ClientError::ServerErrorCode { url, status });
            }
        };
        let text = resp.text().await?;
        let result: Result<$crate::rpc::common::ApiResponse<$expected>, _> = text.parse();

        match result {
            Err(e) => {
                tracing::warn!(
                    method = "GET",
                    url = %url,
                    response = text.as_str(),
                    "Unexpected response from server"
                );
                Err(e.into())
            },
            Ok(resp) => {
                if resp.is_err() {
                    tracing::warn!(
                        method = "GET",
                        url = %url,
                        response = text.as_str(),
                        "API error response"
                    );
                }
                match resp.into_client_result()? {
                    Some(value) => Ok(value),
                    None => Err($crate::client::ClientError::EmptyResponse { url }),
                }
            }
        }
    }};
}
