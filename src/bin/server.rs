use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use panel_layout::solver::Solver;
use panel_layout::types::{
    Demand, Rect, SheetLayout, SheetSpec, Solution, deserialize_u32_from_number, expand_demands,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequest {
    board: Rect,
    pieces: Vec<PieceRequest>,
    #[serde(default)]
    kerf: f64,
}

#[derive(Deserialize, Serialize)]
struct PieceRequest {
    rect: Rect,
    #[serde(default = "default_qty", deserialize_with = "deserialize_u32_from_number")]
    qty: u32,
}

/// Largest number of individual pieces a single request may ask for.
const MAX_PIECES: u64 = 10_000;

fn default_qty() -> u32 {
    1
}

#[derive(Serialize)]
struct PackResponse {
    sheets: Vec<SheetLayout>,
    board: Rect,
    kerf: f64,
    sheet_count: usize,
    piece_count: usize,
    overall_efficiency: f64,
    overflowing_sheets: Vec<usize>,
}

impl From<Solution> for PackResponse {
    fn from(solution: Solution) -> Self {
        Self {
            sheet_count: solution.sheet_count(),
            piece_count: solution.piece_count(),
            overall_efficiency: solution.overall_efficiency(),
            overflowing_sheets: solution.overflowing_sheets(),
            board: solution.spec.board,
            kerf: solution.spec.kerf,
            sheets: solution.sheets,
        }
    }
}

fn build_solver(req: PackRequest) -> Result<Solver, String> {
    let total: u64 = req.pieces.iter().map(|p| p.qty as u64).sum();
    if total > MAX_PIECES {
        return Err(format!(
            "request asks for {total} pieces, at most {MAX_PIECES} are allowed"
        ));
    }

    let demands: Vec<Demand> = req
        .pieces
        .into_iter()
        .map(|p| {
            if p.qty == 0 {
                return Err(format!("quantity for piece {} must be non-zero", p.rect));
            }
            Ok(Demand {
                rect: p.rect,
                qty: p.qty,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let spec = SheetSpec::new(req.board, req.kerf).map_err(|e| e.to_string())?;
    Solver::new(spec, expand_demands(&demands)).map_err(|e| e.to_string())
}

async fn pack(Json(req): Json<PackRequest>) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    let solver = build_solver(req).map_err(|e| (StatusCode::BAD_REQUEST, e))?;
    let solution = solver.solve();
    for i in solution.overflowing_sheets() {
        tracing::warn!(sheet = i, "sheet holds a piece larger than the board");
    }

    Ok(Json(PackResponse::from(solution)))
}

fn log_level() -> Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::INFO)
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("failed to open development.log: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(log_level())
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("Listening on {addr}");
    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("server error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> PackRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_request_defaults() {
        let req = request(r#"{"board": {"w": 2800, "h": 2070}, "pieces": [{"rect": {"w": 1200, "h": 800}}]}"#);
        assert_eq!(req.kerf, 0.0);
        assert_eq!(req.pieces[0].qty, 1);
    }

    #[test]
    fn test_build_solver_packs_request() {
        let req = request(
            r#"{"board": {"w": 2800, "h": 2070}, "kerf": 3,
                "pieces": [{"rect": {"w": 1200, "h": 800}, "qty": 5.0}, {"rect": {"w": 504, "h": 769}, "qty": 2}]}"#,
        );
        let response = PackResponse::from(build_solver(req).unwrap().solve());
        assert_eq!(response.piece_count, 7);
        assert_eq!(response.sheets[0].kind.to_string(), "optimal:1200x800");
        assert!(response.overflowing_sheets.is_empty());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["sheets"][0]["kind"], "optimal:1200x800");
    }

    #[test]
    fn test_build_solver_rejects_bad_input() {
        let zero_board = request(r#"{"board": {"w": 0, "h": 2070}, "pieces": []}"#);
        assert!(build_solver(zero_board).is_err());

        let zero_qty = request(r#"{"board": {"w": 100, "h": 100}, "pieces": [{"rect": {"w": 10, "h": 10}, "qty": 0}]}"#);
        assert!(build_solver(zero_qty).is_err());

        let zero_piece = request(r#"{"board": {"w": 100, "h": 100}, "pieces": [{"rect": {"w": 0, "h": 10}}]}"#);
        assert!(build_solver(zero_piece).is_err());

        let negative_kerf = request(r#"{"board": {"w": 100, "h": 100}, "pieces": [], "kerf": -1}"#);
        assert!(build_solver(negative_kerf).is_err());
    }

    #[test]
    fn test_build_solver_caps_total_pieces() {
        let at_limit = request(
            r#"{"board": {"w": 100, "h": 100},
                "pieces": [{"rect": {"w": 10, "h": 10}, "qty": 6000}, {"rect": {"w": 5, "h": 5}, "qty": 4000}]}"#,
        );
        assert!(build_solver(at_limit).is_ok());

        let over_limit = request(
            r#"{"board": {"w": 100, "h": 100},
                "pieces": [{"rect": {"w": 10, "h": 10}, "qty": 6000}, {"rect": {"w": 5, "h": 5}, "qty": 4001}]}"#,
        );
        let err = build_solver(over_limit).err().unwrap();
        assert!(err.contains("10001"), "{err}");

        let huge = request(r#"{"board": {"w": 100, "h": 100}, "pieces": [{"rect": {"w": 1, "h": 1}, "qty": 4294967295}]}"#);
        assert!(build_solver(huge).is_err());
    }
}
