//! AWS Lambda handler for running a simulation
//!
//! Accepts a JSON configuration through a Lambda Function URL and returns the
//! summary, tax assessment and (optionally) the monthly ledger as JSON.

use aws_lambda_events::event::lambda_function_urls::{
    LambdaFunctionUrlRequest, LambdaFunctionUrlResponse,
};
use bond_reinvestment::simulation::{Aggregates, MonthlyRecord, SimulationEngine, Summary, TaxAssessment};
use bond_reinvestment::SimulationConfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Request body
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Simulation parameters; omitted fields use the defaults
    #[serde(default)]
    pub config: SimulationConfig,

    /// Whether to return the monthly ledger (default: true)
    #[serde(default = "default_include_records")]
    pub include_records: bool,
}

fn default_include_records() -> bool {
    true
}

/// Response body
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub summary: Summary,
    pub tax: TaxAssessment,
    pub aggregates: Aggregates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<MonthlyRecord>>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn simulate(body: &str) -> Result<SimulationResponse, String> {
    let start = Instant::now();

    let request: SimulationRequest =
        serde_json::from_str(body).map_err(|e| format!("invalid request body: {}", e))?;
    let result = SimulationEngine::new(request.config)
        .run()
        .map_err(|e| e.to_string())?;

    Ok(SimulationResponse {
        summary: result.summary,
        tax: result.tax,
        aggregates: result.aggregates,
        records: request.include_records.then_some(result.records),
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

fn json_response(status_code: i64, body: String) -> Result<LambdaFunctionUrlResponse, Error> {
    let mut response = LambdaFunctionUrlResponse {
        status_code,
        headers: Default::default(),
        body: Some(body),
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response
        .headers
        .insert("content-type", "application/json".parse()?);
    Ok(response)
}

async fn handler(
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let (request, _context) = event.into_parts();

    if request.is_base64_encoded {
        let body = serde_json::to_string(&ErrorResponse {
            error: "base64-encoded bodies are not supported, send application/json".to_string(),
        })?;
        return json_response(400, body);
    }

    let body = request.body.as_deref().unwrap_or("{}");
    match simulate(body) {
        Ok(response) => {
            log::info!(
                "Simulation complete: net profit {:.2} in {} ms",
                response.summary.net_profit,
                response.execution_time_ms
            );
            json_response(200, serde_json::to_string(&response)?)
        }
        Err(error) => {
            log::warn!("Rejected request: {}", error);
            json_response(400, serde_json::to_string(&ErrorResponse { error })?)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
