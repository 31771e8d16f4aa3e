//! HTTP server with optional live reload

use anyhow::Result;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::{Blog, BlogError};

/// Live reload client, appended to every page while `--watch` is on.
///
/// The index reloads on any change; a post page only when its own file changed.
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function () {
    var socket = new WebSocket('ws://' + location.host + '/__livereload');
    socket.onmessage = function (event) {
        var change = JSON.parse(event.data);
        var path = decodeURIComponent(location.pathname);
        var shown = path.indexOf('/post/') === 0 ? path.slice('/post/'.length) : null;
        if (shown === null || change.files.indexOf(shown) !== -1) {
            location.reload();
        }
    };
})();
</script>
</body>
"#;

/// Posts that changed on disk, pushed to live reload clients as JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostsChanged {
    /// File names inside the posts directory
    pub files: Vec<String>,
}

/// Server state
pub struct ServerState {
    blog: Blog,
    reload_tx: broadcast::Sender<PostsChanged>,
    live_reload: bool,
}

impl ServerState {
    pub fn new(blog: Blog, live_reload: bool) -> Self {
        let (reload_tx, _) = broadcast::channel::<PostsChanged>(16);
        Self {
            blog,
            reload_tx,
            live_reload,
        }
    }
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/post/*file_name", get(post_handler));

    if state.live_reload {
        app = app.route("/__livereload", get(livereload_handler));
    }

    app.fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: Blog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let posts_dir = blog.posts_dir.clone();
    let state = Arc::new(ServerState::new(blog, watch));
    let reload_tx = state.reload_tx.clone();
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let url = format!("http://{}:{}", ip, port);
    tracing::info!("Server running at {}", url);
    if watch {
        tracing::info!("Live reload enabled. Watching {:?} for changes", posts_dir);
    }
    println!("Press Ctrl+C to stop.");

    // Start file watcher if watch mode is enabled
    if watch {
        std::thread::spawn(move || {
            if let Err(e) = watch_posts(posts_dir, reload_tx) {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Watch the posts directory and tell connected pages which posts changed
fn watch_posts(posts_dir: PathBuf, reload_tx: broadcast::Sender<PostsChanged>) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&posts_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", posts_dir);

    for result in rx {
        match result {
            Ok(events) => {
                let files = changed_posts(events.iter().map(|e| e.path.as_path()));
                if files.is_empty() {
                    continue;
                }

                tracing::info!("Posts changed: {}", files.join(", "));
                // No receivers just means no page is open
                let _ = reload_tx.send(PostsChanged { files });
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// File names of the Markdown posts among `paths`, sorted and deduplicated
fn changed_posts<'a>(paths: impl IntoIterator<Item = &'a std::path::Path>) -> Vec<String> {
    let mut files: Vec<String> = paths
        .into_iter()
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .collect();
    files.sort();
    files.dedup();
    files
}

/// `GET /`
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let blog = state.blog.clone();
    let result = tokio::task::spawn_blocking(move || blog.index_page()).await;
    page_response(&state, result)
}

/// `GET /post/<file name>`
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(file_name): Path<String>,
) -> Response {
    let blog = state.blog.clone();
    let result = tokio::task::spawn_blocking(move || blog.post_page(&file_name)).await;
    page_response(&state, result)
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// Turn a rendered page (or the reason it failed) into a response
fn page_response(
    state: &ServerState,
    result: std::result::Result<crate::error::Result<String>, tokio::task::JoinError>,
) -> Response {
    match result {
        Ok(Ok(html)) if state.live_reload => Html(inject_live_reload(&html)).into_response(),
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(err)) => err.into_response(),
        Err(err) => {
            tracing::error!("Render task failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        match self {
            BlogError::NotFound(name) => {
                tracing::debug!("Post not found: {}", name);
                (StatusCode::NOT_FOUND, "Post not found").into_response()
            }
            err => {
                tracing::error!("Request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Forward post changes to one live reload client until either side goes away
async fn handle_livereload_socket(
    mut socket: WebSocket,
    mut changes: broadcast::Receiver<PostsChanged>,
) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(change) => {
                    let payload = match serde_json::to_string(&change) {
                        Ok(payload) => payload,
                        Err(e) => {
                            tracing::error!("Failed to encode change notice: {}", e);
                            break;
                        }
                    };
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!("Live reload client skipped {} notices", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                _ => {}
            },
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replacen("</body>", LIVE_RELOAD_SCRIPT, 1)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}
