use crate::core::TvError;

/// Read a successful response body as text, turning non-2xx statuses into [`TvError::Status`].
pub(crate) async fn get_text(resp: reqwest::Response) -> Result<String, TvError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(TvError::Status {
            status: status.as_u16(),
            url: resp.url().to_string(),
        });
    }
    Ok(resp.text().await?)
}
