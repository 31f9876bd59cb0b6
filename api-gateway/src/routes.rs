//! REST routes over the ledger facade
//!
//! Every handler maps to one [`FlightSureData`] operation. The caller
//! identity comes from the `x-caller-id` header.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{
        ws::{Message, WebSocket},
        FromRequestParts, Path, State, WebSocketUpgrade,
    },
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use flightsure_common::{AccountId, Flight, InsurancePolicy};
use flightsure_data::{FlightSureData, LedgerSummary};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Header carrying the caller's account id
pub const CALLER_HEADER: &str = "x-caller-id";

// ============ STATE ============

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<FlightSureData>,
}

impl AppState {
    pub fn new(ledger: Arc<FlightSureData>) -> Self {
        Self { ledger }
    }
}

/// Caller identity taken from [`CALLER_HEADER`]
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub AccountId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| ApiError::BadRequest(format!("missing {CALLER_HEADER} header")))?;

        let value = value
            .to_str()
            .map_err(|_| ApiError::BadRequest(format!("invalid {CALLER_HEADER} header")))?;

        value
            .parse()
            .map(Caller)
            .map_err(|e| ApiError::BadRequest(format!("invalid {CALLER_HEADER} header: {e}")))
    }
}

// ============ MODELS ============

#[derive(Debug, Serialize, Deserialize)]
pub struct OperationalStatus {
    pub operational: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddAirlineRequest {
    pub id: AccountId,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AirlineView {
    pub id: AccountId,
    pub name: String,
    pub added: bool,
    pub registered: bool,
    pub funding_submitted: bool,
    pub registration_votes: u64,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub voter: AccountId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteCount {
    pub votee: AccountId,
    pub votes: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteStatus {
    pub voter: AccountId,
    pub votee: AccountId,
    pub voted: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterFlightRequest {
    pub airline: AccountId,
    pub flight_code: String,
    pub timestamp: u64,
}

#[derive(Debug, Deserialize)]
pub struct PolicyRequest {
    pub airline: AccountId,
    pub flight_code: String,
    pub insuree: AccountId,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub airline: AccountId,
    pub flight_code: String,
    pub multiplier_tenths: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreditBalanceView {
    pub insuree: AccountId,
    pub balance: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Withdrawal {
    pub insuree: AccountId,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Reserve {
    pub reserve: u64,
}

type ApiResult<T> = Result<T, ApiError>;

// ============ HANDLERS ============

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn get_operational(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<OperationalStatus>> {
    let operational = state.ledger.is_operational(&caller)?;
    Ok(Json(OperationalStatus { operational }))
}

async fn set_operational(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<OperationalStatus>,
) -> ApiResult<Json<OperationalStatus>> {
    state.ledger.set_operating_status(&caller, req.operational)?;
    Ok(Json(req))
}

async fn authorize(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    state.ledger.authorize_caller(&caller, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn deauthorize(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    state.ledger.deauthorize_caller(&caller, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_airline(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<AddAirlineRequest>,
) -> ApiResult<StatusCode> {
    state.ledger.add_airline(&caller, &req.id, &req.name)?;
    Ok(StatusCode::CREATED)
}

async fn list_registered_airlines(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<Vec<AccountId>>> {
    Ok(Json(state.ledger.registered_airlines(&caller)?))
}

async fn get_airline(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<AccountId>,
) -> ApiResult<Json<AirlineView>> {
    let airline = state
        .ledger
        .airline(&caller, &id)?
        .filter(|a| a.is_added_as(&id))
        .ok_or_else(|| ApiError::NotFound(format!("airline {id}")))?;

    Ok(Json(AirlineView {
        id,
        name: airline.name,
        added: true,
        registered: airline.is_registered,
        funding_submitted: airline.funding_submitted,
        registration_votes: airline.registration_votes,
    }))
}

async fn register_airline(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    state.ledger.add_to_registered_airlines(&caller, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_funding(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<AccountId>,
) -> ApiResult<StatusCode> {
    state.ledger.set_funding_submitted(&caller, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn vote(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(votee): Path<AccountId>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<Json<VoteCount>> {
    let votes = state.ledger.vote_for_airline(&caller, &req.voter, &votee)?;
    Ok(Json(VoteCount { votee, votes }))
}

async fn get_vote(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((votee, voter)): Path<(AccountId, AccountId)>,
) -> ApiResult<Json<VoteStatus>> {
    let voted = state.ledger.has_airline_voted_for(&caller, &voter, &votee)?;
    Ok(Json(VoteStatus {
        voter,
        votee,
        voted,
    }))
}

async fn register_flight(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<RegisterFlightRequest>,
) -> ApiResult<StatusCode> {
    state
        .ledger
        .add_to_registered_flights(&caller, &req.airline, &req.flight_code, req.timestamp)?;
    Ok(StatusCode::CREATED)
}

async fn get_flight(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((airline, flight_code, timestamp)): Path<(AccountId, String, u64)>,
) -> ApiResult<Json<Flight>> {
    state
        .ledger
        .flight(&caller, &airline, &flight_code, timestamp)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("flight {flight_code} at {timestamp}")))
}

async fn add_policy(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<PolicyRequest>,
) -> ApiResult<StatusCode> {
    state.ledger.add_to_insurance_policy(
        &caller,
        &req.airline,
        &req.flight_code,
        &req.insuree,
        req.amount,
    )?;
    Ok(StatusCode::CREATED)
}

async fn list_policies(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path((airline, flight_code)): Path<(AccountId, String)>,
) -> ApiResult<Json<Vec<InsurancePolicy>>> {
    Ok(Json(state.ledger.policies(&caller, &airline, &flight_code)?))
}

async fn credit_insurees(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<CreditRequest>,
) -> ApiResult<StatusCode> {
    state.ledger.credit_insurees(
        &caller,
        &req.airline,
        &req.flight_code,
        req.multiplier_tenths,
    )?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_summary(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> ApiResult<Json<LedgerSummary>> {
    Ok(Json(state.ledger.summary(&caller)?))
}

async fn get_credit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(insuree): Path<AccountId>,
) -> ApiResult<Json<CreditBalanceView>> {
    let balance = state.ledger.balance_of(&caller, &insuree)?;
    Ok(Json(CreditBalanceView { insuree, balance }))
}

async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(insuree): Path<AccountId>,
) -> ApiResult<Json<Withdrawal>> {
    let amount = state
        .ledger
        .withdraw_credits_for_insuree(&caller, &insuree)?;
    Ok(Json(Withdrawal { insuree, amount }))
}

async fn deposit(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(req): Json<DepositRequest>,
) -> ApiResult<Json<Reserve>> {
    let reserve = state.ledger.accept_deposit(&caller, req.amount)?;
    Ok(Json(Reserve { reserve }))
}

// WebSocket handler
async fn websocket_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.ledger.subscribe();

    let send_task = tokio::spawn(async move {
        loop {
            let record = match rx.recv().await {
                Ok(record) => record,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Event stream lagged");
                    continue;
                }
                Err(_) => break,
            };

            let msg = match serde_json::to_string(&record) {
                Ok(msg) => msg,
                Err(e) => {
                    warn!(error = %e, "Failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(msg)).await.is_err() {
                break;
            }
        }
    });

    let recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = send_task => {},
        _ = recv_task => {},
    }
    debug!("Event stream closed");
}

// ============ ROUTER ============

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health_check))
        // Guards
        .route("/operational", get(get_operational).put(set_operational))
        .route("/authorizations/:id", put(authorize).delete(deauthorize))
        // Airlines
        .route("/airlines", get(list_registered_airlines).post(add_airline))
        .route("/airlines/:id", get(get_airline))
        .route("/airlines/:id/registration", post(register_airline))
        .route("/airlines/:id/funding", post(submit_funding))
        .route("/airlines/:id/votes", post(vote))
        .route("/airlines/:id/votes/:voter", get(get_vote))
        // Flights
        .route("/flights", post(register_flight))
        .route("/flights/:airline/:code/:ts", get(get_flight))
        // Policies & credits
        .route("/policies", post(add_policy))
        .route("/policies/:airline/:code", get(list_policies))
        .route("/policies/credit", post(credit_insurees))
        .route("/credits/:insuree", get(get_credit))
        .route("/credits/:insuree/withdraw", post(withdraw))
        .route("/deposits", post(deposit))
        .route("/summary", get(get_summary))
        // WebSocket
        .route("/ws", get(websocket_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use flightsure_data::LedgerConfig;
    use tower::ServiceExt;

    fn owner() -> AccountId {
        AccountId::from_label("owner")
    }

    fn app() -> Router {
        let ledger = Arc::new(FlightSureData::new(owner(), LedgerConfig::default()));
        router(AppState::new(ledger))
    }

    fn request(method: Method, uri: &str, caller: Option<AccountId>, body: serde_json::Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(caller) = caller {
            builder = builder.header(CALLER_HEADER, caller.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_missing_caller_header() {
        let response = app()
            .oneshot(request(Method::GET, "/operational", None, serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unauthorized_caller_forbidden() {
        let stranger = AccountId::from_label("stranger");
        let response = app()
            .oneshot(request(Method::GET, "/airlines", Some(stranger), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_airline_vote_flow() {
        let app = app();
        let delta = AccountId::from_label("delta");
        let united = AccountId::from_label("united");

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                "/airlines",
                Some(owner()),
                serde_json::json!({ "id": delta, "name": "Delta" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(request(
                Method::POST,
                &format!("/airlines/{delta}/votes"),
                Some(owner()),
                serde_json::json!({ "voter": united }),
            ))
            .await
            .unwrap();
        assert_eq!(json(response).await["votes"], 1);

        let response = app
            .clone()
            .oneshot(request(
                Method::GET,
                &format!("/airlines/{delta}"),
                Some(owner()),
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        let view = json(response).await;
        assert_eq!(view["name"], "Delta");
        assert_eq!(view["registered"], false);
        assert_eq!(view["registration_votes"], 1);
    }

    #[tokio::test]
    async fn test_unknown_airline_not_found() {
        let delta = AccountId::from_label("delta");
        let response = app()
            .oneshot(request(
                Method::GET,
                &format!("/airlines/{delta}"),
                Some(owner()),
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_registration_of_unknown_airline() {
        let delta = AccountId::from_label("delta");
        let uri = format!("/airlines/{delta}/registration");

        let response = app()
            .oneshot(request(Method::POST, &uri, Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let strict = Arc::new(FlightSureData::new(
            owner(),
            LedgerConfig::reject_unknown_airlines(),
        ));
        let response = router(AppState::new(strict))
            .oneshot(request(Method::POST, &uri, Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_registered_airline_survives_re_add() {
        let app = app();
        let delta = AccountId::from_label("delta");
        let add = || {
            request(
                Method::POST,
                "/airlines",
                Some(owner()),
                serde_json::json!({ "id": delta, "name": "Delta" }),
            )
        };

        app.clone().oneshot(add()).await.unwrap();
        app.clone()
            .oneshot(request(
                Method::POST,
                &format!("/airlines/{delta}/registration"),
                Some(owner()),
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        let response = app.clone().oneshot(add()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(request(
                Method::GET,
                &format!("/airlines/{delta}"),
                Some(owner()),
                serde_json::Value::Null,
            ))
            .await
            .unwrap();
        assert_eq!(json(response).await["registered"], true);
    }

    #[tokio::test]
    async fn test_summary() {
        let response = app()
            .oneshot(request(Method::GET, "/summary", Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        let summary = json(response).await;
        assert_eq!(summary["airlines"], 0);
        assert_eq!(summary["authorized_callers"], 1);
    }

    #[tokio::test]
    async fn test_paused_ledger_unavailable() {
        let app = app();
        let response = app
            .clone()
            .oneshot(request(
                Method::PUT,
                "/operational",
                Some(owner()),
                serde_json::json!({ "operational": false }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(request(Method::GET, "/airlines", Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_credit_and_withdraw() {
        let app = app();
        let delta = AccountId::from_label("delta");
        let passenger = AccountId::from_label("passenger");

        let calls = [
            (Method::POST, "/deposits".to_string(), serde_json::json!({ "amount": 5_000_000 })),
            (
                Method::POST,
                "/policies".to_string(),
                serde_json::json!({
                    "airline": delta,
                    "flight_code": "DL100",
                    "insuree": passenger,
                    "amount": 1_000_000
                }),
            ),
            (
                Method::POST,
                "/policies/credit".to_string(),
                serde_json::json!({
                    "airline": delta,
                    "flight_code": "DL100",
                    "multiplier_tenths": 15
                }),
            ),
        ];
        for (method, uri, body) in calls {
            let response = app
                .clone()
                .oneshot(request(method, &uri, Some(owner()), body))
                .await
                .unwrap();
            assert!(response.status().is_success(), "{uri}: {}", response.status());
        }

        let withdraw_uri = format!("/credits/{passenger}/withdraw");
        let response = app
            .clone()
            .oneshot(request(Method::POST, &withdraw_uri, Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(json(response).await["amount"], 1_500_000);

        let response = app
            .oneshot(request(Method::POST, &withdraw_uri, Some(owner()), serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
