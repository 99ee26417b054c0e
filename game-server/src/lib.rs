use std::sync::Arc;
use uuid::Uuid;
use warp::Filter;

use crate::config::Config;
use crate::session_manager::SessionManager;
use crate::websocket::ConnectionManager;
use crate::websocket::connection::ConnectionId;

pub mod config;
pub mod image_provider;
pub mod session_manager;
pub mod websocket;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    session_manager: Arc<SessionManager>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let config_filter = warp::any().map({
        let config = config.clone();
        move || config.clone()
    });

    // WebSocket endpoint, one game session per socket
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter.clone())
        .and(session_manager_filter.clone())
        .and(config_filter.clone())
        .map(|ws: warp::ws::Ws, conn_mgr, session_mgr, config| {
            ws.on_upgrade(move |socket| {
                websocket::handle_connection(socket, conn_mgr, session_mgr, config)
            })
        });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // Read-only view of a session, same shape as the socket's StateUpdate
    let session_state = warp::path!("session" / String / "state")
        .and(warp::get())
        .and(session_manager_filter.clone())
        .and_then(handle_session_state_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET"]);

    websocket
        .or(health)
        .or(session_state)
        .with(cors)
        .with(warp::log("guess_my_breed"))
}

async fn handle_session_state_request(
    session_id: String,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let session_uuid = match Uuid::parse_str(&session_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({
                    "error": "Invalid session ID format"
                })),
                warp::http::StatusCode::BAD_REQUEST,
            ));
        }
    };

    match session_manager
        .get_view(ConnectionId::from(session_uuid))
        .await
    {
        Some(view) => Ok(warp::reply::with_status(
            warp::reply::json(&view),
            warp::http::StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&serde_json::json!({
                "error": "Session not found"
            })),
            warp::http::StatusCode::NOT_FOUND,
        )),
    }
}
