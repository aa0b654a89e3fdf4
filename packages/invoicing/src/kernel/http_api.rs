//! Remote invoicing API over HTTP.
//!
//! Every endpoint lives under `{api_url}/api/v1`. Requests carry the bearer
//! token and the selected company in the `company` header; responses are
//! JSON, mostly wrapped in `{"data": ...}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ApiError, ApiResult, BaseInvoiceApi};
use crate::common::{Page, PageQuery};
use crate::config::Config;
use crate::domains::company::models::{
    Company, CompanyParams, Currency, DateFormat, FiscalYear, Language, LogoUpload, Timezone,
};
use crate::domains::customers::models::{Customer, CustomerParams};
use crate::domains::customize::models::{CustomizeKind, CustomizeSettings};
use crate::domains::payments::models::{Payment, PaymentParams, UnpaidInvoice};
use crate::domains::settings::models::{Country, Preferences};

// =============================================================================
// Response Envelopes
// =============================================================================

#[derive(Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Deserialize)]
struct Languages {
    languages: Vec<Language>,
}

#[derive(Deserialize)]
struct TimeZones {
    time_zones: Vec<Timezone>,
}

#[derive(Deserialize)]
struct DateFormats {
    date_formats: Vec<DateFormat>,
}

#[derive(Deserialize)]
struct FiscalYears {
    fiscal_years: Vec<FiscalYear>,
}

#[derive(Serialize)]
struct SettingsBody<'a, T> {
    settings: &'a T,
}

#[derive(Serialize)]
struct SettingsQuery {
    #[serde(rename = "type")]
    kind: CustomizeKind,
}

#[derive(Serialize)]
struct ForgotPasswordBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct UnpaidInvoiceQuery<'a> {
    customer_id: i64,
    status: &'static str,
    #[serde(flatten)]
    page: &'a PageQuery,
}

// =============================================================================
// HttpInvoiceApi
// =============================================================================

pub struct HttpInvoiceApi {
    client: Client,
    base_url: String,
    token: Option<String>,
    company_id: Option<String>,
    timeout: Duration,
}

impl HttpInvoiceApi {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!("{}/api/v1", config.base_url()),
            token: config.api_token.clone(),
            company_id: config.company_id.clone(),
            timeout: config.timeout,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request_for(method, path, self.company_id.as_deref())
    }

    fn request_for(&self, method: Method, path: &str, company: Option<&str>) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%method, %url, company, "api request");

        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        if let Some(company) = company {
            builder = builder.header("company", company);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.send(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.json::<Data<T>>(builder).await.map(|wrapped| wrapped.data)
    }
}

#[async_trait]
impl BaseInvoiceApi for HttpInvoiceApi {
    async fn fetch_payments(&self, query: &PageQuery) -> ApiResult<Page<Payment>> {
        self.json(self.request(Method::GET, "payments").query(query))
            .await
    }

    async fn create_payment(&self, params: &PaymentParams) -> ApiResult<Payment> {
        self.data(self.request(Method::POST, "payments").json(params))
            .await
    }

    async fn update_payment(&self, id: i64, params: &PaymentParams) -> ApiResult<Payment> {
        self.data(
            self.request(Method::PUT, &format!("payments/{}", id))
                .json(params),
        )
        .await
    }

    async fn delete_payment(&self, id: i64) -> ApiResult<()> {
        self.send(
            self.request(Method::POST, "payments/delete")
                .json(&serde_json::json!({ "ids": [id] })),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_unpaid_invoices(
        &self,
        customer_id: i64,
        query: &PageQuery,
    ) -> ApiResult<Page<UnpaidInvoice>> {
        let query = UnpaidInvoiceQuery {
            customer_id,
            status: "UNPAID",
            page: query,
        };
        self.json(self.request(Method::GET, "invoices").query(&query))
            .await
    }

    async fn fetch_customers(&self, query: &PageQuery) -> ApiResult<Page<Customer>> {
        self.json(self.request(Method::GET, "customers").query(query))
            .await
    }

    async fn create_customer(&self, params: &CustomerParams) -> ApiResult<Customer> {
        self.data(self.request(Method::POST, "customers").json(params))
            .await
    }

    async fn update_customer(&self, id: i64, params: &CustomerParams) -> ApiResult<Customer> {
        self.data(
            self.request(Method::PUT, &format!("customers/{}", id))
                .json(params),
        )
        .await
    }

    async fn delete_customer(&self, id: i64) -> ApiResult<()> {
        self.send(
            self.request(Method::POST, "customers/delete")
                .json(&serde_json::json!({ "ids": [id] })),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_companies(&self) -> ApiResult<Vec<Company>> {
        self.data(self.request(Method::GET, "companies")).await
    }

    async fn create_company(&self, params: &CompanyParams) -> ApiResult<Company> {
        self.data(self.request(Method::POST, "companies").json(params))
            .await
    }

    async fn upload_company_logo(&self, company_id: i64, logo: &LogoUpload) -> ApiResult<()> {
        let part = multipart::Part::bytes(logo.bytes.clone())
            .file_name(logo.file_name.clone())
            .mime_str(&logo.mime)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let form = multipart::Form::new().part("company_logo", part);

        let company = company_id.to_string();
        self.send(
            self.request_for(Method::POST, "company/upload-logo", Some(&company))
                .multipart(form),
        )
        .await
        .map(|_| ())
    }

    async fn fetch_preferences(&self) -> ApiResult<Preferences> {
        self.json(self.request(Method::GET, "company/settings"))
            .await
    }

    async fn update_preferences(&self, preferences: &Preferences) -> ApiResult<Preferences> {
        let body = SettingsBody {
            settings: preferences,
        };
        self.send(self.request(Method::POST, "company/settings").json(&body))
            .await?;
        Ok(preferences.clone())
    }

    async fn fetch_currencies(&self) -> ApiResult<Vec<Currency>> {
        self.data(self.request(Method::GET, "currencies")).await
    }

    async fn fetch_timezones(&self) -> ApiResult<Vec<Timezone>> {
        self.json::<TimeZones>(self.request(Method::GET, "timezones"))
            .await
            .map(|body| body.time_zones)
    }

    async fn fetch_date_formats(&self) -> ApiResult<Vec<DateFormat>> {
        self.json::<DateFormats>(self.request(Method::GET, "date/formats"))
            .await
            .map(|body| body.date_formats)
    }

    async fn fetch_fiscal_years(&self) -> ApiResult<Vec<FiscalYear>> {
        self.json::<FiscalYears>(self.request(Method::GET, "fiscal/years"))
            .await
            .map(|body| body.fiscal_years)
    }

    async fn fetch_languages(&self) -> ApiResult<Vec<Language>> {
        self.json::<Languages>(self.request(Method::GET, "languages"))
            .await
            .map(|body| body.languages)
    }

    async fn fetch_countries(&self) -> ApiResult<Vec<Country>> {
        self.data(self.request(Method::GET, "countries")).await
    }

    async fn fetch_customize_settings(&self, kind: CustomizeKind) -> ApiResult<CustomizeSettings> {
        self.json(
            self.request(Method::GET, "company/settings")
                .query(&SettingsQuery { kind }),
        )
        .await
    }

    async fn update_customize_settings(
        &self,
        kind: CustomizeKind,
        settings: &CustomizeSettings,
    ) -> ApiResult<()> {
        debug!(kind = kind.as_str(), fields = settings.0.len(), "saving customization");
        let body = SettingsBody { settings };
        self.send(self.request(Method::POST, "company/settings").json(&body))
            .await
            .map(|_| ())
    }

    async fn send_forgot_password_mail(&self, email: &str) -> ApiResult<()> {
        self.send(
            self.request(Method::POST, "auth/password/email")
                .json(&ForgotPasswordBody { email }),
        )
        .await
        .map(|_| ())
    }
}
