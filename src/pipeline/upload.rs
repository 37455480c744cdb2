//! Upload: send the validated file to the invoice API and interpret the reply.
//!
//! The network call sits behind [`InvoiceApi`] so the rest of the submission
//! can be exercised without a server. The default transport,
//! [`HttpInvoiceApi`], performs exactly one multipart POST and hands back the
//! raw status and body; [`interpret_reply`] turns that into invoice data or
//! a typed error. Nothing is retried.

use crate::error::{InvoiceScanError, PROCESSING_FALLBACK_MESSAGE};
use crate::model::{InvoiceData, SelectedFile, UploadResponse};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

/// Multipart field name the API reads the image from.
pub const FILE_FIELD: &str = "file";

/// Status line and body of an HTTP reply, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A successfully processed invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub invoice: InvoiceData,
    /// Informational message from the API, if any.
    pub message: Option<String>,
}

/// Transport for one upload.
///
/// Implementations perform a single request and report either the raw reply
/// or [`InvoiceScanError::NetworkError`] when no reply was received.
#[async_trait]
pub trait InvoiceApi: Send + Sync {
    async fn upload(&self, file: &SelectedFile) -> Result<HttpReply, InvoiceScanError>;
}

/// [`InvoiceApi`] over HTTP using reqwest.
///
/// No cookie store is configured, so no credentials ride along with the
/// cross-origin request.
#[derive(Debug, Clone)]
pub struct HttpInvoiceApi {
    client: reqwest::Client,
    upload_url: String,
}

impl HttpInvoiceApi {
    /// Build a transport for `{api_base}/upload`.
    pub fn new(api_base: &str) -> Result<Self, InvoiceScanError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| InvoiceScanError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            upload_url: format!("{}/upload", api_base.trim_end_matches('/')),
        })
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl InvoiceApi for HttpInvoiceApi {
    async fn upload(&self, file: &SelectedFile) -> Result<HttpReply, InvoiceScanError> {
        let mime_type = file.mime_essence();
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(mime_type)
            .map_err(|e| InvoiceScanError::Internal(format!("MIME type '{mime_type}': {e}")))?;
        let form = Form::new().part(FILE_FIELD, part);

        info!("Uploading '{}' to {}", file.name, self.upload_url);

        let response = self
            .client
            .post(&self.upload_url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(|e| InvoiceScanError::NetworkError {
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = match response.bytes().await {
            Ok(b) => b.to_vec(),
            // The status alone decides a non-2xx outcome.
            Err(_) if !(200..300).contains(&status) => Vec::new(),
            Err(e) => {
                return Err(InvoiceScanError::NetworkError {
                    reason: e.to_string(),
                })
            }
        };

        debug!("Upload reply: HTTP {}, {} bytes", status, body.len());
        Ok(HttpReply { status, body })
    }
}

/// Perform the upload and interpret the reply.
pub async fn upload_invoice(
    api: &dyn InvoiceApi,
    file: &SelectedFile,
) -> Result<UploadOutcome, InvoiceScanError> {
    let reply = api.upload(file).await?;
    interpret_reply(&reply)
}

/// Turn a raw reply into invoice data.
///
/// - non-2xx → [`InvoiceScanError::HttpError`], whatever the body says
/// - body not JSON → [`InvoiceScanError::MalformedResponse`]
/// - `status` other than `"success"` → [`InvoiceScanError::ProcessingError`]
///   carrying the body's `error`, or [`PROCESSING_FALLBACK_MESSAGE`]
/// - `"success"` without a well-formed `invoice_data` →
///   [`InvoiceScanError::MalformedResponse`]
pub fn interpret_reply(reply: &HttpReply) -> Result<UploadOutcome, InvoiceScanError> {
    if !reply.is_success() {
        if !reply.body.is_empty() {
            debug!(
                "HTTP {} body: {}",
                reply.status,
                String::from_utf8_lossy(&reply.body)
            );
        }
        return Err(InvoiceScanError::HttpError {
            status: reply.status,
        });
    }

    let value: serde_json::Value =
        serde_json::from_slice(&reply.body).map_err(|e| InvoiceScanError::MalformedResponse {
            detail: format!("body is not JSON: {e}"),
        })?;

    let status = value.get("status").and_then(|s| s.as_str());
    if status != Some(UploadResponse::SUCCESS) {
        let message = value
            .get("error")
            .and_then(error_text)
            .unwrap_or_else(|| PROCESSING_FALLBACK_MESSAGE.to_string());
        return Err(InvoiceScanError::ProcessingError { message });
    }

    let parsed: UploadResponse =
        serde_json::from_value(value).map_err(|e| InvoiceScanError::MalformedResponse {
            detail: format!("unexpected invoice_data shape: {e}"),
        })?;

    let invoice = parsed
        .invoice_data
        .ok_or_else(|| InvoiceScanError::MalformedResponse {
            detail: "missing invoice_data".into(),
        })?;

    Ok(UploadOutcome {
        invoice,
        message: parsed.message,
    })
}

/// Text for a backend `error` value, or `None` when it is empty-ish
/// (`null`, `false`, `0`, `""`). Non-string values are shown as JSON.
fn error_text(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r#"{
        "status": "success",
        "message": "Invoice processed successfully",
        "invoice_data": {
            "line_items": [
                {"description": "Item A", "quantity": 2, "unit_price": 10, "total": 20}
            ],
            "totals": {"subtotal": 20, "tax": 3.4, "total": 23.4}
        }
    }"#;

    #[test]
    fn success_reply() {
        let out = interpret_reply(&HttpReply::new(200, SUCCESS_BODY)).expect("success");
        assert_eq!(out.invoice.line_items[0].description, "Item A");
        assert_eq!(out.invoice.totals.total, 23.4);
        assert_eq!(out.message.as_deref(), Some("Invoice processed successfully"));
    }

    #[test]
    fn non_2xx_is_http_error_even_with_success_body() {
        for status in [301, 400, 404, 500, 503] {
            let err = interpret_reply(&HttpReply::new(status, SUCCESS_BODY)).unwrap_err();
            assert!(
                matches!(err, InvoiceScanError::HttpError { status: s } if s == status),
                "status {status}: {err:?}"
            );
        }
    }

    #[test]
    fn other_2xx_codes_are_accepted() {
        assert!(interpret_reply(&HttpReply::new(201, SUCCESS_BODY)).is_ok());
    }

    #[test]
    fn processing_error_uses_body_message() {
        let body = r#"{"status": "error", "error": "Failed to process with Gemini: quota"}"#;
        let err = interpret_reply(&HttpReply::new(200, body)).unwrap_err();
        match err {
            InvoiceScanError::ProcessingError { message } => {
                assert_eq!(message, "Failed to process with Gemini: quota")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn processing_error_falls_back() {
        for body in [
            r#"{"status": "error"}"#,
            r#"{"status": "error", "error": ""}"#,
            r#"{"status": "SUCCESS"}"#,
            r#"{"error": null}"#,
            r#"[]"#,
        ] {
            let err = interpret_reply(&HttpReply::new(200, body)).unwrap_err();
            assert!(
                matches!(&err, InvoiceScanError::ProcessingError { message } if message == PROCESSING_FALLBACK_MESSAGE),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn non_string_error_is_shown_as_text() {
        for (body, expected) in [
            (r#"{"status": "error", "error": 42}"#, "42"),
            (r#"{"status": "error", "error": true}"#, "true"),
            (r#"{"status": "error", "error": {"code": 7}}"#, r#"{"code":7}"#),
            (r#"{"status": "error", "error": ["quota"]}"#, r#"["quota"]"#),
        ] {
            let err = interpret_reply(&HttpReply::new(200, body)).unwrap_err();
            assert!(
                matches!(&err, InvoiceScanError::ProcessingError { message } if message == expected),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn falsy_error_values_fall_back() {
        for body in [
            r#"{"status": "error", "error": false}"#,
            r#"{"status": "error", "error": 0}"#,
        ] {
            let err = interpret_reply(&HttpReply::new(200, body)).unwrap_err();
            assert!(
                matches!(&err, InvoiceScanError::ProcessingError { message } if message == PROCESSING_FALLBACK_MESSAGE),
                "{body}: {err:?}"
            );
        }
    }

    #[test]
    fn success_tolerates_non_string_error_field() {
        let body = r#"{"status":"success","error":0,"invoice_data":{"line_items":[],"totals":{"subtotal":0,"tax":0,"total":0}}}"#;
        assert!(interpret_reply(&HttpReply::new(200, body)).is_ok());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = interpret_reply(&HttpReply::new(200, "<html>oops</html>")).unwrap_err();
        assert!(matches!(err, InvoiceScanError::MalformedResponse { .. }));
    }

    #[test]
    fn success_without_invoice_data_is_malformed() {
        let err = interpret_reply(&HttpReply::new(200, r#"{"status":"success"}"#)).unwrap_err();
        assert!(err.to_string().contains("missing invoice_data"));
    }

    #[test]
    fn success_with_wrong_shape_is_malformed() {
        let body = r#"{"status":"success","invoice_data":{"line_items":"none"}}"#;
        let err = interpret_reply(&HttpReply::new(200, body)).unwrap_err();
        assert!(matches!(err, InvoiceScanError::MalformedResponse { .. }));
    }

    #[test]
    fn upload_url_is_derived_from_base() {
        let api = HttpInvoiceApi::new("http://localhost:5000/").unwrap();
        assert_eq!(api.upload_url(), "http://localhost:5000/upload");
    }
}
