//! Adapter tests against an in-process HTTP server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use repasse_core::contract::{ContractSummary, LeaseContract, YearMonth};
use repasse_core::ports::{
    CollaboratorError, ContractRegistry, PeriodicCalculation, QuoteRequest, SettlementStore,
};
use repasse_core::settlement::{SettlementEngine, SettlementInputs, SettlementRecord, SettlementRequest};
use repasse_shared::types::{ContractId, SettlementId};

use crate::{
    CachedContractRegistry, HttpContractRegistry, HttpPeriodicCalculation, HttpSettlementStore,
    build_client,
};

const KNOWN_CONTRACT: &str = "0191f3a0-0000-7000-8000-000000000001";

fn contract_json(id: &str) -> Value {
    json!({
        "id": id,
        "code": "LOC-0001",
        "start_date": "2025-06-01",
        "duration_months": 30,
        "rent": "1500.00",
        "admin_fee_percent": "10",
        "charges": { "condo_fee": "200.00" },
        "retention": { "condo_fee": true },
        "landlords": [{
            "landlord_id": "0191f3a0-0000-7000-8000-0000000000aa",
            "name": "Helena Prado",
            "percentage": "100",
            "is_primary": true
        }]
    })
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/")
}

fn fake_services() -> Router {
    Router::new()
        .route(
            "/contracts/eligible",
            get(|Query(params): Query<std::collections::HashMap<String, String>>| async move {
                let period = params.get("period").cloned().unwrap_or_default();
                Json(json!([{
                    "id": KNOWN_CONTRACT,
                    "code": format!("LOC-0001/{period}"),
                    "property": "Rua das Flores, 120",
                    "rent": "1500.00",
                    "start_date": "2025-06-01"
                }]))
            }),
        )
        .route(
            "/contracts/{id}",
            get(|Path(id): Path<String>| async move {
                if id == KNOWN_CONTRACT {
                    Ok(Json(contract_json(&id)))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }),
        )
        .route(
            "/calculations/period",
            post(|Json(request): Json<QuoteRequest>| async move {
                let remaining = if request.exit_date.is_some() { 4 } else { 0 };
                Json(json!({
                    "total": "1700.00",
                    "discount": "0",
                    "multa": "2400.00",
                    "remaining_months": remaining,
                    "period_days": 12,
                    "retention": { "admin_fee": "150.00", "other": "200.00" }
                }))
            }),
        )
        .route(
            "/settlements",
            post(|Json(record): Json<Value>| async move {
                if record["invoice_total"].is_string() {
                    (StatusCode::CREATED, Json(json!({ "id": "0191f3a0-0000-7000-8000-0000000000ff" })))
                } else {
                    (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "error": "invalid" })))
                }
            }),
        )
}

fn client() -> reqwest::Client {
    build_client(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_contract() {
    let base = serve(fake_services()).await;
    let registry = HttpContractRegistry::new(client(), base);

    let contract = registry
        .fetch_contract(KNOWN_CONTRACT.parse().unwrap())
        .await
        .unwrap();

    assert_eq!(contract.code, "LOC-0001");
    assert_eq!(contract.rent, dec!(1500.00));
    assert!(contract.retention.condo_fee);
    assert_eq!(contract.landlords.len(), 1);
}

#[tokio::test]
async fn test_missing_contract_maps_to_not_found() {
    let base = serve(fake_services()).await;
    let registry = HttpContractRegistry::new(client(), base);

    let err = registry.fetch_contract(ContractId::new()).await.unwrap_err();
    assert!(matches!(err, CollaboratorError::NotFound { service: "contract-registry", .. }));
}

#[tokio::test]
async fn test_eligible_contracts_sends_period() {
    let base = serve(fake_services()).await;
    let registry = HttpContractRegistry::new(client(), base);

    let contracts = registry
        .eligible_contracts(YearMonth::new(2026, 3).unwrap())
        .await
        .unwrap();
    assert_eq!(contracts.len(), 1);
    assert_eq!(contracts[0].code, "LOC-0001/2026-03");
}

#[tokio::test]
async fn test_calculate_reads_legacy_penalty() {
    let base = serve(fake_services()).await;
    let calculator = HttpPeriodicCalculation::new(client(), base);
    let contract: LeaseContract = serde_json::from_value(contract_json(KNOWN_CONTRACT)).unwrap();
    let inputs = SettlementInputs::new(
        contract,
        SettlementRequest::termination(NaiveDate::from_ymd_opt(2026, 3, 12).unwrap()),
    );

    let quote = calculator
        .calculate(&QuoteRequest::from_inputs(&inputs))
        .await
        .unwrap();
    assert_eq!(quote.penalty, dec!(2400.00));
    assert_eq!(quote.remaining_months, 4);
    assert_eq!(quote.retention.admin_fee, dec!(150.00));
}

#[tokio::test]
async fn test_save_returns_identifier() {
    let base = serve(fake_services()).await;
    let store = HttpSettlementStore::new(client(), base);
    let contract: LeaseContract = serde_json::from_value(contract_json(KNOWN_CONTRACT)).unwrap();
    let inputs = SettlementInputs::new(contract, SettlementRequest::monthly(YearMonth::new(2026, 3).unwrap()));
    let result = SettlementEngine::default().compute(&inputs).unwrap();
    let record = SettlementRecord::new(&inputs, &result, chrono::Utc::now());

    let id = store.save(&record).await.unwrap();
    assert_eq!(id, "0191f3a0-0000-7000-8000-0000000000ff".parse::<SettlementId>().unwrap());
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let calculator = HttpPeriodicCalculation::new(client(), format!("http://{addr}"));
    let contract: LeaseContract = serde_json::from_value(contract_json(KNOWN_CONTRACT)).unwrap();
    let inputs = SettlementInputs::new(contract, SettlementRequest::monthly(YearMonth::new(2026, 3).unwrap()));

    let err = calculator
        .calculate(&QuoteRequest::from_inputs(&inputs))
        .await
        .unwrap_err();
    assert!(err.is_transient());
    assert!(matches!(err, CollaboratorError::Unavailable { .. }));
}

#[tokio::test]
async fn test_server_error_maps_to_status() {
    let router = Router::new().route(
        "/calculations/period",
        post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let base = serve(router).await;
    let calculator = HttpPeriodicCalculation::new(client(), base);
    let contract: LeaseContract = serde_json::from_value(contract_json(KNOWN_CONTRACT)).unwrap();
    let inputs = SettlementInputs::new(contract, SettlementRequest::monthly(YearMonth::new(2026, 3).unwrap()));

    let err = calculator
        .calculate(&QuoteRequest::from_inputs(&inputs))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        CollaboratorError::Status {
            service: "periodic-calculation",
            status: 503
        }
    );
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode() {
    let router = Router::new().route(
        "/contracts/{id}",
        get(|| async { Json(json!({ "unexpected": true })) }),
    );
    let base = serve(router).await;
    let registry = HttpContractRegistry::new(client(), base);

    let err = registry.fetch_contract(ContractId::new()).await.unwrap_err();
    assert!(matches!(err, CollaboratorError::Decode { .. }));
}

// =========================================================================
// Cache
// =========================================================================

struct CountingRegistry {
    contract: LeaseContract,
    fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl ContractRegistry for CountingRegistry {
    async fn fetch_contract(&self, id: ContractId) -> Result<LeaseContract, CollaboratorError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if id == self.contract.id {
            Ok(self.contract.clone())
        } else {
            Err(CollaboratorError::NotFound {
                service: "contract-registry",
                entity: format!("contract {id}"),
            })
        }
    }

    async fn eligible_contracts(
        &self,
        _period: YearMonth,
    ) -> Result<Vec<ContractSummary>, CollaboratorError> {
        Ok(vec![])
    }
}

fn counting() -> (CachedContractRegistry<CountingRegistry>, Arc<AtomicUsize>, ContractId) {
    let contract: LeaseContract = serde_json::from_value(contract_json(KNOWN_CONTRACT)).unwrap();
    let id = contract.id;
    let fetches = Arc::new(AtomicUsize::new(0));
    let registry = CachedContractRegistry::new(
        CountingRegistry {
            contract,
            fetches: Arc::clone(&fetches),
        },
        10,
        Duration::from_secs(60),
    );
    (registry, fetches, id)
}

#[tokio::test]
async fn test_cache_serves_repeat_lookups() {
    let (registry, fetches, id) = counting();

    let first = registry.fetch_contract(id).await.unwrap();
    let second = registry.fetch_contract(id).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_cache_does_not_store_failures() {
    let (registry, fetches, _) = counting();
    let missing = ContractId::new();

    assert!(registry.fetch_contract(missing).await.is_err());
    assert!(registry.fetch_contract(missing).await.is_err());
    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let (registry, fetches, id) = counting();

    registry.fetch_contract(id).await.unwrap();
    registry.invalidate(id).await;
    registry.fetch_contract(id).await.unwrap();

    assert_eq!(fetches.load(Ordering::SeqCst), 2);
}
