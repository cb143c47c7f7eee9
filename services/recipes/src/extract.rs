//! Body extractors that report failures in the API error format

use std::collections::HashMap;

use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

use crate::{
    error::{ApiError, FieldErrors, NON_FIELD_ERRORS},
    storage::UploadedFile,
};

fn malformed(message: impl Into<String>) -> ApiError {
    ApiError::Validation(FieldErrors::single(NON_FIELD_ERRORS, message))
}

/// `Json<T>` whose rejections become 400 validation errors
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| malformed(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// Text fields and files of an HTML form
///
/// Accepts `multipart/form-data` as well as urlencoded bodies. File inputs
/// left empty by the browser are dropped.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| malformed(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| malformed(e.body_text()))?;
                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name,
                                content_type,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let text = field.text().await.map_err(|e| malformed(e.body_text()))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Value of a text field, if submitted
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Value of a text field, empty when absent
    pub fn text_or_empty(&self, name: &str) -> &str {
        self.text(name).unwrap_or_default()
    }

    /// Non-blank trimmed value of a text field
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| malformed(e.body_text()))?;
            return FormData::from_multipart(multipart).await;
        }

        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| malformed(e.body_text()))?;
        Ok(FormData {
            fields,
            files: HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Payload {
        name: String,
    }

    #[tokio::test]
    async fn test_api_json_rejection_is_validation_error() {
        let req = http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let result = ApiJson::<Payload>::from_request(req, &()).await;
        match result {
            Err(ApiError::Validation(errors)) => assert!(errors.contains(NON_FIELD_ERRORS)),
            _ => panic!("expected a validation error"),
        }
    }

    #[tokio::test]
    async fn test_api_json_accepts_valid_body() {
        let req = http::Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name": "soup"}"#))
            .unwrap();

        let ApiJson(payload) = ApiJson::<Payload>::from_request(req, &())
            .await
            .unwrap_or_else(|_| panic!("valid json rejected"));
        assert_eq!(payload.name, "soup");
    }

    #[tokio::test]
    async fn test_urlencoded_form() {
        let req = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("username=ann&bio=&next=%2Fadd-recipe%2F"))
            .unwrap();

        let form = FormData::from_request(req, &())
            .await
            .unwrap_or_else(|_| panic!("form rejected"));
        assert_eq!(form.text("username"), Some("ann"));
        assert_eq!(form.text_or_empty("missing"), "");
        assert_eq!(form.non_blank("bio"), None);
        assert_eq!(form.text("next"), Some("/add-recipe/"));
    }

    #[tokio::test]
    async fn test_multipart_form_with_file() {
        let body = concat!(
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"title\"\r\n\r\n",
            "Soup\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"file\"; filename=\"card.txt\"\r\n",
            "Content-Type: text/plain\r\n\r\n",
            "hello\r\n",
            "--XBOUNDARY\r\n",
            "Content-Disposition: form-data; name=\"avatar\"; filename=\"\"\r\n",
            "Content-Type: application/octet-stream\r\n\r\n",
            "\r\n",
            "--XBOUNDARY--\r\n",
        );
        let req = http::Request::builder()
            .method("POST")
            .header(CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(body))
            .unwrap();

        let mut form = FormData::from_request(req, &())
            .await
            .unwrap_or_else(|_| panic!("multipart rejected"));
        assert_eq!(form.text("title"), Some("Soup"));
        let file = form.take_file("file").unwrap();
        assert_eq!(file.file_name, "card.txt");
        assert_eq!(file.bytes, b"hello".to_vec());
        assert!(form.take_file("avatar").is_none());
    }
}
