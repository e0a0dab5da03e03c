use crate::infra::{deserialize_date, deserialize_optional_date, AppState};
use arriendo::assistant::{ChatAssistant, RuleBasedAssistant};
use arriendo::billing::{self, format, ProrationResult};
use arriendo::calendar;
use arriendo::config::BillingConfig;
use arriendo::error::AppError;
use arriendo::listings::{
    import_portfolio, ImportError, InterestPublisher, Listing, ListingDraft, ListingFilter,
    ListingGallery, ListingId, ListingMedia, ListingService, ListingStore,
};
use arriendo::scheduling::{self, TimeSlot};
use arriendo::visits::{VisitBook, VisitDesk, VisitRequest};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct SlotView {
    pub(crate) start_hour: u8,
    pub(crate) end_hour: u8,
    pub(crate) label: String,
}

impl From<TimeSlot> for SlotView {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start_hour: slot.start_hour,
            end_hour: slot.end_hour,
            label: slot.label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SlotsResponse {
    pub(crate) date: NaiveDate,
    pub(crate) slots: Vec<SlotView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListingView {
    #[serde(flatten)]
    pub(crate) listing: Listing,
    pub(crate) typology_label: String,
    pub(crate) rent_display: String,
}

impl From<Listing> for ListingView {
    fn from(listing: Listing) -> Self {
        let typology_label = listing.typology.label();
        let rent_display = format::clp(listing.monthly_rent);
        Self {
            listing,
            typology_label,
            rent_display,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateListingRequest {
    pub(crate) landlord_id: String,
    #[serde(flatten)]
    pub(crate) draft: ListingDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteListingRequest {
    pub(crate) landlord_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) landlord_id: String,
    pub(crate) portfolio_csv: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterestRequest {
    pub(crate) tenant_name: String,
    pub(crate) tenant_email: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisitRequestBody {
    pub(crate) listing_id: String,
    pub(crate) tenant_name: String,
    pub(crate) tenant_email: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) date: NaiveDate,
    pub(crate) start_hour: u8,
    /// Reference date for the "not in the past" check; defaults to today.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VisitConfirmation {
    pub(crate) listing_id: String,
    pub(crate) date: NaiveDate,
    pub(crate) slot: SlotView,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteRequest {
    pub(crate) start_date: Option<String>,
    pub(crate) monthly_rent: Option<f64>,
    pub(crate) deposit_months: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) quote: Option<QuoteView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) prompt: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuoteView {
    pub(crate) is_prorated: bool,
    pub(crate) prorated_days: u32,
    pub(crate) prorated_amount: f64,
    pub(crate) prorated_amount_display: String,
    pub(crate) first_full_month_rent: f64,
    pub(crate) first_full_month_label: String,
    pub(crate) security_deposit: f64,
    pub(crate) security_deposit_display: String,
    pub(crate) total_first_payment: f64,
    pub(crate) total_first_payment_display: String,
    pub(crate) upcoming: Vec<UpcomingView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpcomingView {
    pub(crate) month_label: String,
    pub(crate) amount: f64,
    pub(crate) amount_display: String,
}

impl From<ProrationResult> for QuoteView {
    fn from(result: ProrationResult) -> Self {
        Self {
            is_prorated: result.is_prorated,
            prorated_days: result.prorated_days,
            prorated_amount: result.prorated_amount,
            prorated_amount_display: format::clp(result.prorated_amount),
            first_full_month_rent: result.first_full_month_rent,
            first_full_month_label: format::month_label(result.first_full_month),
            security_deposit: result.security_deposit,
            security_deposit_display: format::clp(result.security_deposit),
            total_first_payment: result.total_first_payment,
            total_first_payment_display: format::clp(result.total_first_payment),
            upcoming: result
                .upcoming
                .iter()
                .map(|charge| UpcomingView {
                    month_label: format::month_label(charge.month),
                    amount: charge.amount,
                    amount_display: format::clp(charge.amount),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatRequest {
    pub(crate) message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PhotoView {
    pub(crate) file_id: String,
    pub(crate) name: String,
    pub(crate) mime_type: Option<String>,
    pub(crate) web_view_link: Option<String>,
}

impl From<ListingMedia> for PhotoView {
    fn from(media: ListingMedia) -> Self {
        Self {
            file_id: media.file_id,
            name: media.name,
            mime_type: media.mime_type,
            web_view_link: media.web_view_link,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PhotosResponse {
    pub(crate) listing_id: String,
    pub(crate) photos: Vec<PhotoView>,
}

pub(crate) fn marketplace_router<S, I, B>(
    catalog: Arc<ListingService<S, I>>,
    desk: Arc<VisitDesk<B>>,
    assistant: Arc<RuleBasedAssistant<S, I>>,
    billing: Arc<BillingConfig>,
    gallery: Arc<ListingGallery>,
) -> Router
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
    B: VisitBook + 'static,
{
    let listings = Router::new()
        .route("/api/v1/listings", post(create_listing_handler::<S, I>))
        .route("/api/v1/listings/browse", get(browse_handler::<S, I>))
        .route("/api/v1/listings/search", post(search_handler::<S, I>))
        .route("/api/v1/listings/import", post(import_handler::<S, I>))
        .route(
            "/api/v1/listings/:listing_id",
            get(get_listing_handler::<S, I>)
                .put(edit_listing_handler::<S, I>)
                .delete(delete_listing_handler::<S, I>),
        )
        .route(
            "/api/v1/listings/:listing_id/interest",
            post(interest_handler::<S, I>),
        )
        .with_state(catalog.clone());

    let photos = Router::new()
        .route(
            "/api/v1/listings/:listing_id/photos",
            get(photos_handler::<S, I>),
        )
        .with_state((catalog.clone(), gallery));

    let visits = Router::new()
        .route("/api/v1/visits", post(visit_request_handler::<S, I, B>))
        .with_state((desk, catalog));

    let chat = Router::new()
        .route("/api/v1/assistant/chat", post(chat_handler::<S, I>))
        .with_state(assistant);

    let billing_routes = Router::new()
        .route(
            "/api/v1/billing/first-payment",
            post(first_payment_handler),
        )
        .with_state(billing);

    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/visits/slots/:date", get(slots_handler))
        .merge(listings)
        .merge(photos)
        .merge(visits)
        .merge(chat)
        .merge(billing_routes)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// The date travels in the path so an unparseable or nonexistent date is a
/// 400, never an empty slot list.
pub(crate) async fn slots_handler(
    Path(date): Path<String>,
) -> Result<Json<SlotsResponse>, AppError> {
    let date = calendar::parse_date(&date)?;
    let slots = scheduling::visit_slots(date)
        .into_iter()
        .map(SlotView::from)
        .collect();
    Ok(Json(SlotsResponse { date, slots }))
}

pub(crate) async fn visit_request_handler<S, I, B>(
    State((desk, catalog)): State<(Arc<VisitDesk<B>>, Arc<ListingService<S, I>>)>,
    Json(body): Json<VisitRequestBody>,
) -> Result<Response, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
    B: VisitBook + 'static,
{
    let listing_id = ListingId(body.listing_id);
    catalog.get(&listing_id)?;

    let today = body.today.unwrap_or_else(|| Local::now().date_naive());
    let recorded = desk.request(
        VisitRequest {
            listing_id,
            tenant_name: body.tenant_name,
            tenant_email: body.tenant_email,
            date: body.date,
            slot: TimeSlot::starting_at(body.start_hour),
        },
        today,
    )?;

    let confirmation = VisitConfirmation {
        listing_id: recorded.listing_id.0,
        date: recorded.date,
        slot: recorded.slot.into(),
    };
    Ok((StatusCode::ACCEPTED, Json(confirmation)).into_response())
}

pub(crate) async fn first_payment_handler(
    State(billing_config): State<Arc<BillingConfig>>,
    Json(body): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, AppError> {
    let start_date = match &body.start_date {
        Some(raw) => Some(calendar::parse_date(raw)?),
        None => None,
    };

    let (Some(start_date), Some(monthly_rent)) = (start_date, body.monthly_rent) else {
        return Ok(Json(QuoteResponse {
            quote: None,
            prompt: Some("Ingresa la fecha de inicio y el arriendo mensual para ver el detalle."),
        }));
    };

    let deposit_months = body
        .deposit_months
        .unwrap_or(billing_config.deposit_months);
    let quote = billing::first_payment_quote(start_date, monthly_rent, deposit_months);

    Ok(Json(match quote {
        Some(result) => QuoteResponse {
            quote: Some(result.into()),
            prompt: None,
        },
        None => QuoteResponse {
            quote: None,
            prompt: Some("El arriendo mensual debe ser un monto positivo."),
        },
    }))
}

pub(crate) async fn create_listing_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Json(body): Json<CreateListingRequest>,
) -> Result<Response, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let listing = catalog.publish(&body.landlord_id, body.draft)?;
    Ok((StatusCode::CREATED, Json(ListingView::from(listing))).into_response())
}

pub(crate) async fn get_listing_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Path(listing_id): Path<String>,
) -> Result<Json<ListingView>, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let listing = catalog.get(&ListingId(listing_id))?;
    Ok(Json(listing.into()))
}

pub(crate) async fn edit_listing_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Path(listing_id): Path<String>,
    Json(body): Json<CreateListingRequest>,
) -> Result<Json<ListingView>, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let listing = catalog.edit(&body.landlord_id, &ListingId(listing_id), body.draft)?;
    Ok(Json(listing.into()))
}

pub(crate) async fn delete_listing_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Path(listing_id): Path<String>,
    Json(body): Json<DeleteListingRequest>,
) -> Result<StatusCode, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    catalog.remove(&body.landlord_id, &ListingId(listing_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn search_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Json(filter): Json<ListingFilter>,
) -> Result<Json<Vec<ListingView>>, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let listings = catalog.search(&filter)?;
    Ok(Json(listings.into_iter().map(ListingView::from).collect()))
}

pub(crate) async fn browse_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let groups: Vec<serde_json::Value> = catalog
        .browse()?
        .into_iter()
        .map(|group| {
            json!({
                "building": group.building,
                "typology": group.typology,
                "typology_label": group.typology_label,
                "rent_band": {
                    "lowest": group.lowest_rent,
                    "lowest_display": format::clp(group.lowest_rent),
                    "highest": group.highest_rent,
                    "highest_display": format::clp(group.highest_rent),
                },
                "listings": group
                    .listings
                    .into_iter()
                    .map(|listing| serde_json::to_value(ListingView::from(listing))
                        .unwrap_or(serde_json::Value::Null))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    Ok(Json(json!({ "groups": groups })))
}

pub(crate) async fn import_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Json(body): Json<ImportRequest>,
) -> Response
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let reader = Cursor::new(body.portfolio_csv.into_bytes());
    let drafts = match import_portfolio(reader) {
        Ok(drafts) => drafts,
        Err(err @ ImportError::Row { .. }) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    let mut published = Vec::with_capacity(drafts.len());
    for draft in drafts {
        match catalog.publish(&body.landlord_id, draft) {
            Ok(listing) => published.push(ListingView::from(listing)),
            Err(err) => {
                let payload = json!({
                    "error": err.to_string(),
                    "published": published.len(),
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
            }
        }
    }

    (
        StatusCode::CREATED,
        Json(json!({ "imported": published.len(), "listings": published })),
    )
        .into_response()
}

pub(crate) async fn interest_handler<S, I>(
    State(catalog): State<Arc<ListingService<S, I>>>,
    Path(listing_id): Path<String>,
    Json(body): Json<InterestRequest>,
) -> Result<StatusCode, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    catalog.express_interest(
        &ListingId(listing_id),
        &body.tenant_name,
        &body.tenant_email,
    )?;
    Ok(StatusCode::ACCEPTED)
}

pub(crate) async fn photos_handler<S, I>(
    State((catalog, gallery)): State<(Arc<ListingService<S, I>>, Arc<ListingGallery>)>,
    Path(listing_id): Path<String>,
) -> Result<Json<PhotosResponse>, AppError>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    let listing = catalog.get(&ListingId(listing_id))?;
    let photos = gallery.photos_for(&listing)?;
    Ok(Json(PhotosResponse {
        listing_id: listing.id.0,
        photos: photos.into_iter().map(PhotoView::from).collect(),
    }))
}

pub(crate) async fn chat_handler<S, I>(
    State(assistant): State<Arc<RuleBasedAssistant<S, I>>>,
    Json(body): Json<ChatRequest>,
) -> Response
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    match assistant.reply(&body.message) {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
