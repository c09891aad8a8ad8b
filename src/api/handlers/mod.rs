use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::casting::{changed_lines, resolve, table, RandomCoins, RoundSequencer, HEXAGRAM_LINES};
use crate::models::*;
use crate::oracle::OracleError;
use crate::reading::{self, Reading};

// ============================================================
// Error Handling
// ============================================================

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

/// Log an internal error and return a sanitized response to the client.
fn internal_error(e: impl std::fmt::Display) -> ApiError {
    tracing::error!("Internal error: {}", e);
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

// ============================================================
// Request / Response Types
// ============================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DivineRequest {
    /// Makes the casting reproducible.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// A hexagram as a list of 0/1 lines, bottom first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HexagramLines {
    pub code: u8,
    pub name: String,
    /// Upper trigram name.
    pub upper: String,
    /// Lower trigram name.
    pub lower: String,
    pub full_name: String,
    pub lines: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving: Option<Vec<bool>>,
}

impl HexagramLines {
    fn new(lines: &[Line], with_moving: bool) -> Self {
        let hexagram = resolve(lines);
        Self {
            code: hexagram.sequence,
            name: hexagram.name,
            upper: table::TRIGRAM_NAMES[hexagram.upper as usize].to_string(),
            lower: table::TRIGRAM_NAMES[hexagram.lower as usize].to_string(),
            full_name: hexagram.full_name,
            lines: lines.iter().map(|l| u8::from(l.yang)).collect(),
            moving: with_moving.then(|| lines.iter().map(|l| l.change).collect()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoinDivination {
    pub method: String,
    pub question: String,
    pub primary: HexagramLines,
    pub changed: HexagramLines,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InterpretSide {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub moving: Vec<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InterpretHexagram {
    #[serde(default)]
    pub primary: InterpretSide,
    #[serde(default)]
    pub changed: InterpretSide,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InterpretRequest {
    pub hexagram: InterpretHexagram,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LineRequest {
    pub code: i64,
    /// 0..=5, bottom first.
    pub line: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LineTextResponse {
    pub text: String,
    pub modern: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RecordCastingInput {
    pub lines: Vec<Line>,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CastingStats,
    /// `名（N次）` or `—`.
    pub most_frequent: String,
}

impl From<CastingStats> for StatsResponse {
    fn from(stats: CastingStats) -> Self {
        let most_frequent = stats.most_frequent_label();
        Self {
            stats,
            most_frequent,
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Casting
// ============================================================

pub async fn divine_coin(
    Json(req): Json<DivineRequest>,
) -> Result<Json<CoinDivination>, ApiError> {
    let coins = match req.seed.as_deref() {
        Some(seed) if !seed.is_empty() => RandomCoins::with_seed_str(seed),
        _ => RandomCoins::new(),
    };

    let mut sequencer = RoundSequencer::new(coins);
    sequencer
        .complete_immediately()
        .ok_or_else(|| internal_error("casting did not complete"))?;

    let lines = sequencer.lines();
    Ok(Json(CoinDivination {
        method: "coin".to_string(),
        question: req.topic.unwrap_or_default(),
        primary: HexagramLines::new(lines, true),
        changed: HexagramLines::new(&changed_lines(lines), false),
    }))
}

pub async fn get_hexagram(
    State(state): State<AppState>,
    Path(code): Path<i64>,
) -> Result<Json<InterpretationRecord>, ApiError> {
    let sequence = valid_code(code)?;
    state
        .library
        .lookup(sequence)
        .cloned()
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "hexagram not found"))
}

pub async fn interpret(
    State(state): State<AppState>,
    Json(req): Json<InterpretRequest>,
) -> Json<Reading> {
    let hexagram = req.hexagram;
    Json(reading::traditional_reading(
        &state.library,
        &hexagram.primary.name,
        &hexagram.primary.moving,
        &hexagram.changed.name,
        req.question.as_deref(),
    ))
}

pub async fn line_text(
    State(state): State<AppState>,
    Json(req): Json<LineRequest>,
) -> Result<Json<LineTextResponse>, ApiError> {
    let sequence = valid_code(req.code)?;
    let record = state
        .library
        .lookup(sequence)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "hexagram not found"))?;

    let line = usize::try_from(req.line)
        .ok()
        .and_then(|i| record.lines.get(i));

    Ok(Json(LineTextResponse {
        text: line.map(|l| l.text().to_string()).unwrap_or_default(),
        modern: line.and_then(|l| l.modern()).map(str::to_string),
    }))
}

fn valid_code(code: i64) -> Result<u8, ApiError> {
    match u8::try_from(code) {
        Ok(seq @ 1..=64) => Ok(seq),
        _ => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Hexagram code must be between 1 and 64",
        )),
    }
}

// ============================================================
// AI Commentary
// ============================================================

pub async fn analyse(
    State(state): State<AppState>,
    Json(mut req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    if req.question.trim().is_empty() {
        req.question = DEFAULT_QUESTION.to_string();
    }

    match state.upstream.analyse(&req).await {
        Ok(content) => Ok(Json(AnalysisResponse { content })),
        Err(e) => {
            let status = match &e {
                OracleError::NotConfigured => StatusCode::BAD_REQUEST,
                OracleError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            tracing::warn!("AI analysis failed: {}", e);
            let detail = match e {
                OracleError::Upstream(msg) => format!("AI 服务请求失败: {}", msg),
                other => other.to_string(),
            };
            Err(api_error(status, detail))
        }
    }
}

// ============================================================
// Statistics
// ============================================================

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    state
        .db
        .get_stats(Utc::now().date_naive())
        .map(|s| Json(s.into()))
        .map_err(internal_error)
}

pub async fn record_casting(
    State(state): State<AppState>,
    Json(input): Json<RecordCastingInput>,
) -> Result<(StatusCode, Json<StatsResponse>), ApiError> {
    if input.lines.len() != HEXAGRAM_LINES {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "a casting needs exactly six lines",
        ));
    }

    let today = Utc::now().date_naive();
    let hexagram = resolve(&input.lines);
    state
        .db
        .record_casting(&hexagram, input.question.as_deref(), today)
        .map_err(internal_error)?;

    let stats = state.db.get_stats(today).map_err(internal_error)?;
    Ok((StatusCode::CREATED, Json(stats.into())))
}
